//! Aggregation of checks and eligibility into the caller-facing verdict.

use super::domain::{
    EligibilityResult, ExtractedFields, FieldKey, ValidationCheck, VerificationResult,
};

const FIELD_WEIGHT: f64 = 0.6;
const CHECK_WEIGHT: f64 = 0.4;
const DEFAULT_FIELD_CONFIDENCE: f64 = 50.0;
const DEFAULT_CHECK_SCORE: f64 = 70.0;
const PARTIAL_PASS_RATE: f64 = 0.7;
const MANUAL_REVIEW_FAILURES: usize = 3;

pub const AFFIRMATIVE_ACTIONS: [&str; 2] = [
    "Document appears valid and consistent with the application",
    "Proceed with the visa application for the requested category",
];

/// Assemble the terminal result from already computed checks and eligibility.
pub fn build_result(
    fields: ExtractedFields,
    checks: Vec<ValidationCheck>,
    eligibility: EligibilityResult,
) -> VerificationResult {
    VerificationResult {
        overall_confidence: overall_confidence(&fields, &checks),
        recommended_actions: recommended_actions(&checks, &eligibility),
        summary: summary(&fields, &checks, &eligibility),
        extracted_fields: fields,
        validation_checks: checks,
        eligibility_assessment: eligibility,
    }
}

/// `round(0.6 * mean field confidence + 0.4 * check pass percentage)`, clamped to 0-100.
pub fn overall_confidence(fields: &ExtractedFields, checks: &[ValidationCheck]) -> u8 {
    let field_average = if fields.iter().any(|(_, field)| field.confidence > 0) {
        let total: u32 = fields
            .iter()
            .map(|(_, field)| u32::from(field.confidence))
            .sum();
        f64::from(total) / fields.len() as f64
    } else {
        DEFAULT_FIELD_CONFIDENCE
    };

    let check_score = match pass_rate(checks) {
        Some(rate) => rate * 100.0,
        None => DEFAULT_CHECK_SCORE,
    };

    (FIELD_WEIGHT * field_average + CHECK_WEIGHT * check_score)
        .round()
        .clamp(0.0, 100.0) as u8
}

pub fn recommended_actions(
    checks: &[ValidationCheck],
    eligibility: &EligibilityResult,
) -> Vec<String> {
    let failed: Vec<&str> = checks
        .iter()
        .filter(|check| !check.passed)
        .map(|check| check.field.as_str())
        .collect();

    if failed.is_empty() && eligibility.eligible {
        return AFFIRMATIVE_ACTIONS.iter().map(|action| action.to_string()).collect();
    }

    let failed_on = |needles: &[&str]| {
        failed.iter().any(|field| {
            let field = field.to_lowercase();
            needles.iter().any(|needle| field.contains(needle))
        })
    };

    let mut actions = Vec::new();
    if failed_on(&["expiry"]) {
        actions.push(
            "Renew the travel document before applying; it is expired or does not meet validity requirements"
                .to_string(),
        );
    }
    if failed_on(&["mrz", "checksum"]) {
        actions.push(
            "Rescan the machine-readable zone (MRZ) with better lighting and focus".to_string(),
        );
    }
    if failed_on(&["name"]) {
        actions.push(
            "Confirm the applicant name matches the document exactly, including middle names"
                .to_string(),
        );
    }
    if !eligibility.eligible {
        actions.push(format!("Address eligibility issue: {}", eligibility.reason));
    }
    if failed.len() > MANUAL_REVIEW_FAILURES {
        actions.push("Flag application for manual review by a consular officer".to_string());
    }

    actions
}

pub fn summary(
    fields: &ExtractedFields,
    checks: &[ValidationCheck],
    eligibility: &EligibilityResult,
) -> String {
    let document_type = fields.value(FieldKey::DocumentType).unwrap_or("document");
    let document_number = fields.value(FieldKey::DocumentNumber).unwrap_or("unknown");
    let name = fields
        .display_name()
        .unwrap_or_else(|| "unknown".to_string());

    let total = checks.len();
    let passed = checks.iter().filter(|check| check.passed).count();
    let failed = total - passed;
    let status = if eligibility.eligible {
        "eligible"
    } else {
        "not eligible"
    };

    if failed == 0 && eligibility.eligible {
        return format!(
            "Document verification successful. The {document_type} ({document_number}) for {name} passed all {total} validation checks and the applicant is eligible for the requested visa."
        );
    }

    let detail = format!(
        "The {document_type} ({document_number}) for {name} passed {passed} of {total} validation checks ({failed} failed); applicant is {status}."
    );
    if pass_rate(checks).map_or(true, |rate| rate >= PARTIAL_PASS_RATE) {
        format!("Document partially validated. {detail}")
    } else {
        format!("Document verification raised validation concerns. {detail}")
    }
}

fn pass_rate(checks: &[ValidationCheck]) -> Option<f64> {
    if checks.is_empty() {
        return None;
    }
    let passed = checks.iter().filter(|check| check.passed).count();
    Some(passed as f64 / checks.len() as f64)
}
