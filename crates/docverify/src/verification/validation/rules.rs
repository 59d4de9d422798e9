use chrono::NaiveDate;
use tracing::debug;

use super::super::dates::{add_months, age_on, parse_document_date};
use super::super::domain::{
    ApplicantClaim, CheckField, ExtractedFields, FieldKey, ValidationCheck,
};
use super::super::mrz::{self, MrzAssessment, MrzLines};
use super::super::similarity::similarity;
use super::config::ValidationConfig;

const ACCEPTED_DOCUMENT_TYPES: [&str; 4] = ["passport", "visa", "nationalid", "drivinglicense"];

pub(crate) fn check_expiry(
    fields: &ExtractedFields,
    config: &ValidationConfig,
    today: NaiveDate,
    checks: &mut Vec<ValidationCheck>,
) {
    let Some(raw) = fields.value(FieldKey::ExpiryDate) else {
        return;
    };

    let Some(expiry) = parse_document_date(raw) else {
        checks.push(ValidationCheck::failed(
            CheckField::ExpiryDate,
            "Invalid expiry date format",
        ));
        return;
    };

    if expiry < today {
        checks.push(ValidationCheck::failed(
            CheckField::ExpiryDate,
            format!("Document expired on {raw}"),
        ));
        return;
    }

    checks.push(ValidationCheck::passed(
        CheckField::ExpiryDate,
        format!("Document is valid until {raw}"),
    ));

    // Informational only; the document is still valid.
    if expiry < add_months(today, config.expiry_warning_months) {
        checks.push(ValidationCheck::passed(
            CheckField::ExpiryDate,
            format!(
                "Warning: document expires soon ({raw}), within {} months",
                config.expiry_warning_months
            ),
        ));
    }
}

pub(crate) fn check_issue_date(
    fields: &ExtractedFields,
    today: NaiveDate,
    checks: &mut Vec<ValidationCheck>,
) {
    let Some(raw) = fields.value(FieldKey::IssueDate) else {
        return;
    };

    let check = match parse_document_date(raw) {
        None => ValidationCheck::failed(CheckField::IssueDate, "Invalid issue date format"),
        Some(issued) if issued > today => ValidationCheck::failed(
            CheckField::IssueDate,
            format!("Issue date {raw} is in the future"),
        ),
        Some(_) => {
            ValidationCheck::passed(CheckField::IssueDate, format!("Document issued on {raw}"))
        }
    };
    checks.push(check);
}

pub(crate) fn check_name(
    fields: &ExtractedFields,
    claim: &ApplicantClaim,
    config: &ValidationConfig,
    checks: &mut Vec<ValidationCheck>,
) {
    let (Some(claimed), Some(extracted)) = (claim.name(), fields.display_name()) else {
        return;
    };

    let document_name = extracted.to_lowercase();
    let claimed_name = claimed.to_lowercase();
    let matched = document_name.contains(&claimed_name)
        || claimed_name.contains(&document_name)
        || similarity(&document_name, &claimed_name) > config.name_similarity_threshold;

    let check = if matched {
        ValidationCheck::passed(
            CheckField::Name,
            format!("Name on document matches application ({extracted})"),
        )
    } else {
        ValidationCheck::failed(
            CheckField::Name,
            format!(
                "Name mismatch: document shows \"{extracted}\", application states \"{claimed}\""
            ),
        )
    };
    checks.push(check);
}

pub(crate) fn check_date_of_birth(
    fields: &ExtractedFields,
    claim: &ApplicantClaim,
    config: &ValidationConfig,
    today: NaiveDate,
    checks: &mut Vec<ValidationCheck>,
) {
    let (Some(claimed), Some(extracted)) =
        (claim.date_of_birth(), fields.value(FieldKey::DateOfBirth))
    else {
        return;
    };

    // Exact string comparison; no date normalisation.
    if extracted == claimed {
        checks.push(ValidationCheck::passed(
            CheckField::DateOfBirth,
            "Date of birth matches application",
        ));
    } else {
        checks.push(ValidationCheck::failed(
            CheckField::DateOfBirth,
            format!(
                "Date of birth mismatch: document shows {extracted}, application states {claimed}"
            ),
        ));
    }

    let Some(birth) = parse_document_date(extracted) else {
        checks.push(ValidationCheck::failed(
            CheckField::DateOfBirth,
            "Invalid date of birth format",
        ));
        return;
    };

    let age = age_on(birth, today);
    let check = if (config.minimum_age..config.maximum_age_exclusive).contains(&age) {
        ValidationCheck::passed(
            CheckField::Age,
            format!("Applicant age ({age}) is within the accepted range"),
        )
    } else {
        ValidationCheck::failed(
            CheckField::Age,
            format!(
                "Applicant age ({age}) is outside the accepted range ({}-{})",
                config.minimum_age,
                config.maximum_age_exclusive - 1
            ),
        )
    };
    checks.push(check);
}

pub(crate) fn check_document_number(
    fields: &ExtractedFields,
    claim: &ApplicantClaim,
    checks: &mut Vec<ValidationCheck>,
) {
    let (Some(claimed), Some(extracted)) = (
        claim.passport_number(),
        fields.value(FieldKey::DocumentNumber),
    ) else {
        return;
    };

    let check = if loosely_equal(extracted, claimed) {
        ValidationCheck::passed(
            CheckField::DocumentNumber,
            "Document number matches application",
        )
    } else {
        ValidationCheck::failed(
            CheckField::DocumentNumber,
            format!(
                "Document number mismatch: document shows {extracted}, application states {claimed}"
            ),
        )
    };
    checks.push(check);
}

pub(crate) fn check_nationality(
    fields: &ExtractedFields,
    claim: &ApplicantClaim,
    checks: &mut Vec<ValidationCheck>,
) {
    let (Some(claimed), Some(extracted)) =
        (claim.nationality(), fields.value(FieldKey::Nationality))
    else {
        return;
    };

    let check = if loosely_equal(extracted, claimed) {
        ValidationCheck::passed(CheckField::Nationality, "Nationality matches application")
    } else {
        ValidationCheck::failed(
            CheckField::Nationality,
            format!(
                "Nationality mismatch: document shows {extracted}, application states {claimed}"
            ),
        )
    };
    checks.push(check);
}

pub(crate) fn check_mrz(
    fields: &ExtractedFields,
    config: &ValidationConfig,
    checks: &mut Vec<ValidationCheck>,
) {
    let (Some(line1), Some(line2)) = (
        fields.value(FieldKey::MrzLine1),
        fields.value(FieldKey::MrzLine2),
    ) else {
        return;
    };

    let lines = MrzLines {
        line1,
        line2,
        line3: fields.value(FieldKey::MrzLine3),
    };
    let assessment = mrz::assess(&lines, config.mrz_check_digits);
    if assessment == MrzAssessment::Unclassified {
        debug!(
            line1_len = line1.chars().count(),
            line2_len = line2.chars().count(),
            "mrz lines unclassified; passing structural check"
        );
    }

    checks.push(ValidationCheck {
        field: CheckField::MrzChecksum,
        passed: assessment.passed(),
        message: assessment.message(),
    });
}

pub(crate) fn check_document_type(fields: &ExtractedFields, checks: &mut Vec<ValidationCheck>) {
    let Some(raw) = fields.value(FieldKey::DocumentType) else {
        return;
    };

    let normalized = raw.trim().to_lowercase();
    let check = if ACCEPTED_DOCUMENT_TYPES.contains(&normalized.as_str()) {
        ValidationCheck::passed(
            CheckField::DocumentType,
            format!("Recognized document type: {raw}"),
        )
    } else {
        ValidationCheck::failed(
            CheckField::DocumentType,
            format!("Unrecognized document type: {raw}"),
        )
    };
    checks.push(check);
}

pub(crate) fn check_confidence(
    fields: &ExtractedFields,
    config: &ValidationConfig,
    checks: &mut Vec<ValidationCheck>,
) {
    let low = fields.low_confidence(config.low_confidence_threshold);
    let check = if low.is_empty() {
        ValidationCheck::passed(
            CheckField::Confidence,
            format!(
                "All extracted fields meet the minimum confidence of {}",
                config.low_confidence_threshold
            ),
        )
    } else {
        ValidationCheck::failed(
            CheckField::Confidence,
            format!("Low confidence fields: {}", low.join(", ")),
        )
    };
    checks.push(check);
}

fn loosely_equal(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}
