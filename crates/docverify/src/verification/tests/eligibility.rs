use std::collections::BTreeSet;

use super::common::*;
use crate::verification::domain::{
    ApplicantClaim, CheckField, ExtractedFields, FieldKey, ValidationCheck,
};
use crate::verification::domain::EligibilityResult;
use crate::verification::eligibility::{EligibilityEngine, EligibilityPolicy, PolicyTable};
use crate::verification::{ValidationConfig, VerificationService};

fn assess(fields: &ExtractedFields, claim: &ApplicantClaim) -> EligibilityResult {
    let checks = validator().validate(fields, claim, today());
    engine().assess(fields, claim, &checks, today())
}

fn nationality_table(
    allowed: Option<&[&str]>,
    denied: Option<&[&str]>,
) -> PolicyTable {
    let to_set = |values: &[&str]| -> BTreeSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    };
    let mut policy = EligibilityPolicy::new("tourist", 18, None, 6);
    policy.allowed_nationalities = allowed.map(to_set);
    policy.denied_nationalities = denied.map(to_set);
    PolicyTable::new(vec![policy], "tourist").expect("valid table")
}

#[test]
fn consistent_applicant_is_eligible_for_tourist_visa() {
    let result = assess(&extracted_fields(), &claim());

    assert!(result.eligible, "{}", result.reason);
    assert_eq!(result.visa_type.as_deref(), Some("tourist"));
    assert!(result.reason.contains("tourist"));
}

#[test]
fn seventeen_year_old_tourist_is_below_minimum_age() {
    let (fields, claim) = applicant_born_on("2009-03-01", "tourist");
    let result = assess(&fields, &claim);

    assert!(!result.eligible);
    assert!(
        result.reason.contains("minimum age requirement (18)"),
        "{}",
        result.reason
    );
    assert_eq!(result.visa_type.as_deref(), Some("tourist"));
}

#[test]
fn business_visa_requires_applicants_of_twenty_one() {
    let (fields, claim) = applicant_born_on("2007-01-01", "business");
    let result = assess(&fields, &claim);

    assert!(!result.eligible);
    assert!(result.reason.contains("minimum age requirement (21)"));
    assert_eq!(result.visa_type.as_deref(), Some("business"));
}

#[test]
fn student_visa_enforces_maximum_age() {
    let (fields, claim) = applicant_born_on("1980-06-01", "student");
    let result = assess(&fields, &claim);

    assert!(!result.eligible);
    assert!(result.reason.contains("maximum age limit (35)"), "{}", result.reason);
}

#[test]
fn work_visa_requires_twelve_months_of_passport_validity() {
    let fields = extracted_fields().with(FieldKey::ExpiryDate, "2027-06-30", 90);
    let result = assess(&fields, &claim_for("work"));

    assert!(!result.eligible);
    assert!(result.reason.contains("12 months"), "{}", result.reason);

    let tourist = assess(&fields, &claim_for("tourist"));
    assert!(tourist.eligible, "{}", tourist.reason);
}

#[test]
fn critical_failures_block_and_carry_the_requested_visa_type() {
    let fields = extracted_fields()
        .with(FieldKey::DateOfBirth, "1985-05-05", 90)
        .with(FieldKey::DocumentNumber, "B0000000", 90);
    let result = assess(&fields, &claim_for("Diplomatic"));

    assert!(!result.eligible);
    assert_eq!(result.visa_type.as_deref(), Some("Diplomatic"));
    assert!(result.reason.contains("Date of birth mismatch"));
    assert!(result.reason.contains("; Document number mismatch"));
}

#[test]
fn unknown_visa_type_is_assessed_as_tourist() {
    let (fields, claim) = applicant_born_on("2009-03-01", "Diplomatic");
    let result = assess(&fields, &claim);

    assert!(!result.eligible);
    assert_eq!(result.visa_type.as_deref(), Some("tourist"));
}

#[test]
fn missing_visa_type_defaults_to_tourist() {
    let claim = ApplicantClaim {
        intended_visa_type: None,
        ..claim()
    };
    let result = assess(&extracted_fields(), &claim);

    assert!(result.eligible);
    assert_eq!(result.visa_type.as_deref(), Some("tourist"));
}

#[test]
fn empty_inputs_do_not_divide_by_zero() {
    let result = engine().assess(
        &ExtractedFields::new(),
        &ApplicantClaim::default(),
        &[],
        today(),
    );

    assert!(result.eligible);
    assert!(!result.reason.is_empty());
}

#[test]
fn unparseable_dates_cannot_be_verified() {
    let fields = ExtractedFields::new().with(FieldKey::DateOfBirth, "unknown", 90);
    let result = engine().assess(&fields, &ApplicantClaim::default(), &[], today());
    assert!(!result.eligible);
    assert!(result.reason.contains("Unable to verify applicant age"));

    let fields = ExtractedFields::new().with(FieldKey::ExpiryDate, "unknown", 90);
    let result = engine().assess(&fields, &ApplicantClaim::default(), &[], today());
    assert!(!result.eligible);
    assert_eq!(result.reason, "Unable to verify passport validity");
}

#[test]
fn allowed_nationalities_restrict_eligibility() {
    let engine = EligibilityEngine::new(nationality_table(Some(&["usa", "CAN"]), None));

    let checks = validator().validate(&extracted_fields(), &claim(), today());
    let allowed = engine.assess(&extracted_fields(), &claim(), &checks, today());
    assert!(allowed.eligible, "{}", allowed.reason);

    let mut fields = extracted_fields().with(FieldKey::Nationality, "fra", 90);
    let outsider = engine.assess(&fields, &claim(), &[], today());
    assert!(!outsider.eligible);
    assert!(outsider.reason.contains("FRA"));

    fields.remove(FieldKey::Nationality);
    let unknown = engine.assess(&fields, &claim(), &[], today());
    assert!(!unknown.eligible);
}

#[test]
fn denied_nationalities_reject_matching_applicants() {
    let engine = EligibilityEngine::new(nationality_table(None, Some(&["USA"])));

    let result = engine.assess(&extracted_fields(), &claim(), &[], today());
    assert!(!result.eligible);
    assert!(result.reason.contains("USA"));

    let mut fields = extracted_fields();
    fields.remove(FieldKey::Nationality);
    assert!(engine.assess(&fields, &claim(), &[], today()).eligible);
}

#[test]
fn more_than_three_low_confidence_fields_is_insufficient_quality() {
    let fields = extracted_fields()
        .with(FieldKey::Sex, "M", 50)
        .with(FieldKey::PlaceOfBirth, "Springfield", 40)
        .with(FieldKey::IssuingCountry, "USA", 30);
    assert!(engine().assess(&fields, &claim(), &[], today()).eligible);

    let fields = fields.with(FieldKey::IssueDate, "2020-01-01", 20);
    let result = engine().assess(&fields, &claim(), &[], today());
    assert!(!result.eligible);
    assert!(result.reason.contains("Document quality insufficient"));
}

fn fields_with_four_weak_extras() -> ExtractedFields {
    extracted_fields()
        .with(FieldKey::Sex, "M", 50)
        .with(FieldKey::PlaceOfBirth, "Springfield", 40)
        .with(FieldKey::IssuingCountry, "USA", 30)
        .with(FieldKey::IssueDate, "2020-01-01", 20)
}

#[test]
fn quality_gate_follows_the_configured_confidence_threshold() {
    let fields = fields_with_four_weak_extras();
    assert!(!engine().assess(&fields, &claim(), &[], today()).eligible);

    let lenient = engine().with_low_confidence_threshold(45);
    assert_eq!(lenient.low_confidence_threshold(), 45);
    assert!(lenient.assess(&fields, &claim(), &[], today()).eligible);

    let strict = engine().with_low_confidence_threshold(93);
    let result = strict.assess(&extracted_fields(), &claim(), &[], today());
    assert!(!result.eligible);
    assert!(result.reason.contains("4 fields below 93% confidence"), "{}", result.reason);
}

#[test]
fn service_shares_one_confidence_threshold_between_validator_and_engine() {
    let config = ValidationConfig {
        low_confidence_threshold: 45,
        ..ValidationConfig::default()
    };
    let service = VerificationService::new(config, PolicyTable::standard());

    let result = service.verify(fields_with_four_weak_extras(), &claim(), today());

    let confidence = checks_on(&result.validation_checks, CheckField::Confidence);
    assert_eq!(confidence.len(), 1);
    assert!(!confidence[0].passed);
    assert_eq!(
        confidence[0].message,
        "Low confidence fields: issueDate, issuingCountry, placeOfBirth"
    );
    assert!(
        result.eligibility_assessment.eligible,
        "{}",
        result.eligibility_assessment.reason
    );
}

#[test]
fn low_pass_rate_rejects_even_without_critical_failures() {
    let checks = vec![
        ValidationCheck::passed(CheckField::Nationality, "ok"),
        ValidationCheck::passed(CheckField::DocumentType, "ok"),
        ValidationCheck::failed(CheckField::Confidence, "low"),
    ];
    let result = engine().assess(&extracted_fields(), &claim(), &checks, today());

    assert!(!result.eligible);
    assert!(result.reason.contains("67% passed"), "{}", result.reason);

    let checks = [checks, vec![ValidationCheck::passed(CheckField::Age, "ok")]].concat();
    assert!(engine().assess(&extracted_fields(), &claim(), &checks, today()).eligible);
}

#[test]
fn critical_checks_are_ignored_when_policy_does_not_require_a_valid_passport() {
    let mut policy = EligibilityPolicy::new("tourist", 18, None, 6);
    policy.requires_valid_passport = false;
    let engine =
        EligibilityEngine::new(PolicyTable::new(vec![policy], "tourist").expect("valid table"));

    let checks = vec![
        ValidationCheck::failed(CheckField::Name, "Name mismatch"),
        ValidationCheck::passed(CheckField::Nationality, "ok"),
        ValidationCheck::passed(CheckField::DocumentType, "ok"),
        ValidationCheck::passed(CheckField::Confidence, "ok"),
    ];
    let result = engine.assess(&extracted_fields(), &claim(), &checks, today());
    assert!(result.eligible, "{}", result.reason);
}
