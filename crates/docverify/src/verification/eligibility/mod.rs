mod decision;
mod policy;

pub use decision::Ineligibility;
pub use policy::{EligibilityPolicy, PolicyTable, PolicyTableError};

use chrono::NaiveDate;
use tracing::debug;

use super::domain::{ApplicantClaim, EligibilityResult, ExtractedFields, ValidationCheck};
use super::validation::ValidationConfig;
use decision::first_ineligibility;

const DEFAULT_VISA_TYPE: &str = "tourist";

/// Stateless evaluator applying a policy table to one verification request.
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    policies: PolicyTable,
    low_confidence_threshold: u8,
}

impl EligibilityEngine {
    pub fn new(policies: PolicyTable) -> Self {
        Self {
            policies,
            low_confidence_threshold: ValidationConfig::default().low_confidence_threshold,
        }
    }

    /// Confidence below which a field counts toward the document quality gate.
    pub fn with_low_confidence_threshold(mut self, threshold: u8) -> Self {
        self.low_confidence_threshold = threshold;
        self
    }

    pub fn low_confidence_threshold(&self) -> u8 {
        self.low_confidence_threshold
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    pub fn assess(
        &self,
        fields: &ExtractedFields,
        claim: &ApplicantClaim,
        checks: &[ValidationCheck],
        today: NaiveDate,
    ) -> EligibilityResult {
        let requested = claim.intended_visa_type().unwrap_or(DEFAULT_VISA_TYPE);
        let policy = self.policies.resolve(Some(requested));
        let resolved = policy.visa_type.as_str();

        match first_ineligibility(fields, checks, policy, self.low_confidence_threshold, today) {
            Some(reason) => {
                debug!(visa_type = resolved, ?reason, "applicant ineligible");
                // Critical failures are reported against the requested category.
                let visa_type = match reason {
                    Ineligibility::CriticalChecksFailed { .. } => requested,
                    _ => resolved,
                };
                EligibilityResult {
                    eligible: false,
                    reason: reason.summary(resolved),
                    visa_type: Some(visa_type.to_string()),
                }
            }
            None => EligibilityResult {
                eligible: true,
                reason: format!("Applicant meets all requirements for {resolved} visa"),
                visa_type: Some(resolved.to_string()),
            },
        }
    }
}

impl Default for EligibilityEngine {
    fn default() -> Self {
        Self::new(PolicyTable::default())
    }
}
