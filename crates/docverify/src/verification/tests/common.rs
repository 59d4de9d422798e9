use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::verification::domain::{
    ApplicantClaim, CheckField, ExtractedFields, FieldKey, ValidationCheck,
};
use crate::verification::eligibility::{EligibilityEngine, PolicyTable};
use crate::verification::validation::{DocumentValidator, ValidationConfig};
use crate::verification::{verification_router, VerificationService};

pub(super) const TD3_LINE1: &str = "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<";
pub(super) const TD3_LINE2: &str = "L898902C36UTO7408122F1204159ZE184226B<<<<<10";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date")
}

pub(super) fn claim() -> ApplicantClaim {
    ApplicantClaim {
        name: Some("John Doe".to_string()),
        date_of_birth: Some("1990-01-15".to_string()),
        passport_number: Some("A12345678".to_string()),
        nationality: Some("USA".to_string()),
        intended_visa_type: Some("tourist".to_string()),
    }
}

pub(super) fn claim_for(visa_type: &str) -> ApplicantClaim {
    ApplicantClaim {
        intended_visa_type: Some(visa_type.to_string()),
        ..claim()
    }
}

pub(super) fn extracted_fields() -> ExtractedFields {
    ExtractedFields::new()
        .with(FieldKey::FullName, "John Doe", 95)
        .with(FieldKey::DateOfBirth, "1990-01-15", 90)
        .with(FieldKey::DocumentNumber, "A12345678", 90)
        .with(FieldKey::Nationality, "USA", 92)
        .with(FieldKey::ExpiryDate, "2030-12-31", 90)
        .with(FieldKey::DocumentType, "passport", 95)
}

/// Extracted fields and claim sharing the given date of birth.
pub(super) fn applicant_born_on(birth: &str, visa_type: &str) -> (ExtractedFields, ApplicantClaim) {
    let fields = extracted_fields().with(FieldKey::DateOfBirth, birth, 90);
    let claim = ApplicantClaim {
        date_of_birth: Some(birth.to_string()),
        ..claim_for(visa_type)
    };
    (fields, claim)
}

pub(super) fn validator() -> DocumentValidator {
    DocumentValidator::default()
}

pub(super) fn engine() -> EligibilityEngine {
    EligibilityEngine::new(PolicyTable::standard())
}

pub(super) fn service() -> VerificationService {
    VerificationService::new(ValidationConfig::default(), PolicyTable::standard())
}

pub(super) fn router() -> axum::Router {
    verification_router(Arc::new(service()))
}

pub(super) fn fields_of(checks: &[ValidationCheck]) -> Vec<CheckField> {
    checks.iter().map(|check| check.field).collect()
}

pub(super) fn checks_on(checks: &[ValidationCheck], field: CheckField) -> Vec<&ValidationCheck> {
    checks.iter().filter(|check| check.field == field).collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
