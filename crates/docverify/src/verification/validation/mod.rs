mod config;
mod rules;

pub use config::ValidationConfig;

use chrono::NaiveDate;
use tracing::debug;

use super::domain::{ApplicantClaim, ExtractedFields, ValidationCheck};

/// Runs the fixed rule sequence over extracted fields and the applicant's claims.
///
/// Each rule is skipped when its inputs are missing. Checks are returned in
/// evaluation order and a field name may appear more than once.
#[derive(Debug, Clone, Default)]
pub struct DocumentValidator {
    config: ValidationConfig,
}

impl DocumentValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn validate(
        &self,
        fields: &ExtractedFields,
        claim: &ApplicantClaim,
        today: NaiveDate,
    ) -> Vec<ValidationCheck> {
        let mut checks = Vec::new();

        rules::check_expiry(fields, &self.config, today, &mut checks);
        rules::check_issue_date(fields, today, &mut checks);
        rules::check_name(fields, claim, &self.config, &mut checks);
        rules::check_date_of_birth(fields, claim, &self.config, today, &mut checks);
        rules::check_document_number(fields, claim, &mut checks);
        rules::check_nationality(fields, claim, &mut checks);
        rules::check_mrz(fields, &self.config, &mut checks);
        rules::check_document_type(fields, &mut checks);
        rules::check_confidence(fields, &self.config, &mut checks);

        debug!(
            total = checks.len(),
            failed = checks.iter().filter(|check| !check.passed).count(),
            "document validation complete"
        );

        checks
    }
}
