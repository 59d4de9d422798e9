use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::dates::parse_document_date;
use super::domain::{ApplicantClaim, ExtractedFields, VerificationResult};
use super::eligibility::{EligibilityEngine, PolicyTable};
use super::report;
use super::validation::{DocumentValidator, ValidationConfig};

/// Inbound payload: fields already extracted upstream plus the applicant's claims.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub extracted_fields: ExtractedFields,
    #[serde(default)]
    pub applicant_info: ApplicantClaim,
    /// Evaluation date override (YYYY-MM-DD); defaults to the caller's today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationRequestError {
    #[error("asOf '{0}' is not a valid calendar date")]
    InvalidAsOf(String),
}

/// Composes the validator, eligibility engine, and aggregation into one call.
#[derive(Debug, Clone, Default)]
pub struct VerificationService {
    validator: DocumentValidator,
    engine: EligibilityEngine,
}

impl VerificationService {
    pub fn new(config: ValidationConfig, policies: PolicyTable) -> Self {
        let engine = EligibilityEngine::new(policies)
            .with_low_confidence_threshold(config.low_confidence_threshold);
        Self {
            validator: DocumentValidator::new(config),
            engine,
        }
    }

    pub fn policies(&self) -> &PolicyTable {
        self.engine.policies()
    }

    pub fn validation_config(&self) -> &ValidationConfig {
        self.validator.config()
    }

    pub fn verify(
        &self,
        fields: ExtractedFields,
        claim: &ApplicantClaim,
        today: NaiveDate,
    ) -> VerificationResult {
        let checks = self.validator.validate(&fields, claim, today);
        let eligibility = self.engine.assess(&fields, claim, &checks, today);
        let result = report::build_result(fields, checks, eligibility);

        info!(
            visa_type = result.eligibility_assessment.visa_type.as_deref().unwrap_or("-"),
            eligible = result.eligibility_assessment.eligible,
            confidence = result.overall_confidence,
            checks = result.validation_checks.len(),
            "document verification complete"
        );

        result
    }

    /// Verify a request, honouring its `asOf` override when present.
    pub fn handle(
        &self,
        request: VerificationRequest,
        today: NaiveDate,
    ) -> Result<VerificationResult, VerificationRequestError> {
        let VerificationRequest {
            extracted_fields,
            applicant_info,
            as_of,
        } = request;

        let today = match as_of {
            Some(raw) => {
                parse_document_date(&raw).ok_or(VerificationRequestError::InvalidAsOf(raw))?
            }
            None => today,
        };

        Ok(self.verify(extracted_fields, &applicant_info, today))
    }
}
