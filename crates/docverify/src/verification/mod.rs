//! Document validation, visa eligibility, and result aggregation.
//!
//! Everything below the router is synchronous and side-effect free apart from
//! tracing, so a single [`VerificationService`] can be shared across requests.

pub mod dates;
pub mod domain;
pub mod eligibility;
pub mod mrz;
pub mod report;
pub mod router;
pub mod service;
pub mod similarity;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantClaim, CheckField, EligibilityResult, ExtractedField, ExtractedFields, FieldKey,
    ValidationCheck, VerificationResult,
};
pub use eligibility::{
    EligibilityEngine, EligibilityPolicy, Ineligibility, PolicyTable, PolicyTableError,
};
pub use router::verification_router;
pub use service::{VerificationRequest, VerificationRequestError, VerificationService};
pub use similarity::similarity;
pub use validation::{DocumentValidator, ValidationConfig};
