use super::common::*;
use crate::verification::domain::{
    CheckField, EligibilityResult, ExtractedFields, FieldKey, ValidationCheck,
};
use crate::verification::report::{
    overall_confidence, recommended_actions, summary, AFFIRMATIVE_ACTIONS,
};

fn eligible() -> EligibilityResult {
    EligibilityResult {
        eligible: true,
        reason: "Applicant meets all requirements for tourist visa".to_string(),
        visa_type: Some("tourist".to_string()),
    }
}

fn ineligible(reason: &str) -> EligibilityResult {
    EligibilityResult {
        eligible: false,
        reason: reason.to_string(),
        visa_type: Some("tourist".to_string()),
    }
}

fn passing(count: usize) -> Vec<ValidationCheck> {
    (0..count)
        .map(|_| ValidationCheck::passed(CheckField::DocumentType, "ok"))
        .collect()
}

#[test]
fn confidence_blends_field_average_and_pass_rate() {
    let checks = validator().validate(&extracted_fields(), &claim(), today());
    // fields average 92, every check passes
    assert_eq!(overall_confidence(&extracted_fields(), &checks), 95);

    let mut checks = passing(3);
    checks.push(ValidationCheck::failed(CheckField::Name, "mismatch"));
    let fields = ExtractedFields::new()
        .with(FieldKey::FullName, "A", 80)
        .with(FieldKey::Sex, "F", 0);
    // 0.6 * 40 + 0.4 * 75
    assert_eq!(overall_confidence(&fields, &checks), 54);
}

#[test]
fn confidence_defaults_when_nothing_was_read() {
    let unreadable = ExtractedFields::new().with(FieldKey::FullName, "", 0);
    // 0.6 * 50 + 0.4 * 70
    assert_eq!(overall_confidence(&unreadable, &[]), 58);
    assert_eq!(overall_confidence(&ExtractedFields::new(), &passing(2)), 70);
}

#[test]
fn clean_eligible_result_gets_exactly_two_affirmations() {
    let actions = recommended_actions(&passing(4), &eligible());
    assert_eq!(actions, AFFIRMATIVE_ACTIONS.map(String::from).to_vec());
}

#[test]
fn recommendations_follow_rule_order() {
    let checks = vec![
        ValidationCheck::failed(CheckField::Name, "mismatch"),
        ValidationCheck::failed(CheckField::MrzChecksum, "bad"),
        ValidationCheck::failed(CheckField::ExpiryDate, "expired"),
        ValidationCheck::failed(CheckField::Confidence, "low"),
    ];
    let actions = recommended_actions(&checks, &ineligible("Document validation failed: expired"));

    assert_eq!(actions.len(), 5);
    assert!(actions[0].contains("Renew"));
    assert!(actions[1].contains("MRZ"));
    assert!(actions[2].contains("name"));
    assert!(actions[3].contains("Document validation failed: expired"));
    assert!(actions[4].contains("manual review"));
}

#[test]
fn ineligibility_alone_yields_its_reason() {
    let actions = recommended_actions(&passing(3), &ineligible("too young"));
    assert_eq!(actions, vec!["Address eligibility issue: too young".to_string()]);
}

#[test]
fn failures_without_a_matching_rule_produce_no_actions() {
    let checks = vec![
        ValidationCheck::failed(CheckField::Nationality, "mismatch"),
        ValidationCheck::passed(CheckField::Confidence, "ok"),
    ];
    let actions = recommended_actions(&checks, &eligible());
    assert!(actions.is_empty(), "unexpected actions: {actions:?}");
}

#[test]
fn summary_reports_success() {
    let text = summary(&extracted_fields(), &passing(8), &eligible());

    assert!(text.starts_with("Document verification successful."));
    assert!(text.contains("passport"));
    assert!(text.contains("A12345678"));
    assert!(text.contains("John Doe"));
    assert!(text.contains("8"));
}

#[test]
fn summary_reports_partial_validation() {
    let mut checks = passing(7);
    checks.push(ValidationCheck::failed(CheckField::DateOfBirth, "mismatch"));
    let text = summary(&extracted_fields(), &checks, &ineligible("mismatch"));

    assert!(text.starts_with("Document partially validated."));
    assert!(text.contains("7 of 8"));
    assert!(text.contains("not eligible"));
}

#[test]
fn summary_reports_concerns_and_uses_defaults() {
    let mut checks = passing(1);
    checks.push(ValidationCheck::failed(CheckField::Name, "mismatch"));
    let text = summary(&ExtractedFields::new(), &checks, &eligible());

    assert!(text.starts_with("Document verification raised validation concerns."));
    assert!(text.contains("The document (unknown) for unknown"));
}
