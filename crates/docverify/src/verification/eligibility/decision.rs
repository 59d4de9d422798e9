use chrono::NaiveDate;

use super::super::dates::{add_months, age_on, parse_document_date};
use super::super::domain::{ExtractedFields, FieldKey, ValidationCheck};
use super::policy::EligibilityPolicy;

pub(crate) const MAX_LOW_CONFIDENCE_FIELDS: usize = 3;
pub(crate) const MINIMUM_PASS_RATE: f64 = 0.7;

/// Why an applicant was found ineligible, in rule priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum Ineligibility {
    CriticalChecksFailed { failures: Vec<String> },
    BelowMinimumAge { age: i32, minimum: i32 },
    AboveMaximumAge { age: i32, maximum: i32 },
    UnverifiableAge,
    InsufficientPassportValidity {
        required_months: u32,
        expiry: NaiveDate,
    },
    UnverifiablePassportValidity,
    NationalityNotAllowed { nationality: String },
    NationalityDenied { nationality: String },
    InsufficientDocumentQuality {
        low_confidence_fields: usize,
        threshold: u8,
    },
    LowPassRate { pass_rate: f64 },
}

impl Ineligibility {
    pub fn summary(&self, visa_type: &str) -> String {
        match self {
            Ineligibility::CriticalChecksFailed { failures } => {
                format!("Document validation failed: {}", failures.join("; "))
            }
            Ineligibility::BelowMinimumAge { age, minimum } => format!(
                "Applicant age ({age}) does not meet the minimum age requirement ({minimum}) for {visa_type} visa"
            ),
            Ineligibility::AboveMaximumAge { age, maximum } => format!(
                "Applicant age ({age}) exceeds the maximum age limit ({maximum}) for {visa_type} visa"
            ),
            Ineligibility::UnverifiableAge => {
                "Unable to verify applicant age from the document date of birth".to_string()
            }
            Ineligibility::InsufficientPassportValidity {
                required_months,
                expiry,
            } => format!(
                "Passport must be valid for at least {required_months} months for {visa_type} visa (expires {expiry})"
            ),
            Ineligibility::UnverifiablePassportValidity => {
                "Unable to verify passport validity".to_string()
            }
            Ineligibility::NationalityNotAllowed { nationality } => {
                format!("Nationality {nationality} is not eligible for {visa_type} visa")
            }
            Ineligibility::NationalityDenied { nationality } => format!(
                "Applicants with {nationality} nationality are not eligible for {visa_type} visa"
            ),
            Ineligibility::InsufficientDocumentQuality {
                low_confidence_fields,
                threshold,
            } => format!(
                "Document quality insufficient: {low_confidence_fields} fields below {threshold}% confidence"
            ),
            Ineligibility::LowPassRate { pass_rate } => format!(
                "Too many validation checks failed ({:.0}% passed, {:.0}% required)",
                pass_rate * 100.0,
                MINIMUM_PASS_RATE * 100.0
            ),
        }
    }
}

/// First applicable rejection for `policy`, or `None` when the applicant qualifies.
pub(crate) fn first_ineligibility(
    fields: &ExtractedFields,
    checks: &[ValidationCheck],
    policy: &EligibilityPolicy,
    low_confidence_threshold: u8,
    today: NaiveDate,
) -> Option<Ineligibility> {
    if policy.requires_valid_passport {
        let failures: Vec<String> = checks
            .iter()
            .filter(|check| !check.passed && check.field.is_critical())
            .map(|check| check.message.clone())
            .collect();
        if !failures.is_empty() {
            return Some(Ineligibility::CriticalChecksFailed { failures });
        }
    }

    if let Some(raw) = fields.value(FieldKey::DateOfBirth) {
        let Some(birth) = parse_document_date(raw) else {
            return Some(Ineligibility::UnverifiableAge);
        };
        let age = age_on(birth, today);
        if age < policy.min_age {
            return Some(Ineligibility::BelowMinimumAge {
                age,
                minimum: policy.min_age,
            });
        }
        if let Some(maximum) = policy.max_age {
            if age > maximum {
                return Some(Ineligibility::AboveMaximumAge { age, maximum });
            }
        }
    }

    if let Some(raw) = fields.value(FieldKey::ExpiryDate) {
        let Some(expiry) = parse_document_date(raw) else {
            return Some(Ineligibility::UnverifiablePassportValidity);
        };
        if expiry < add_months(today, policy.min_passport_validity_months) {
            return Some(Ineligibility::InsufficientPassportValidity {
                required_months: policy.min_passport_validity_months,
                expiry,
            });
        }
    }

    let nationality = fields
        .value(FieldKey::Nationality)
        .map(|value| value.trim().to_uppercase());

    if let Some(allowed) = &policy.allowed_nationalities {
        let permitted = nationality
            .as_ref()
            .is_some_and(|nationality| allowed.contains(nationality));
        if !permitted {
            return Some(Ineligibility::NationalityNotAllowed {
                nationality: nationality.unwrap_or_else(|| "UNKNOWN".to_string()),
            });
        }
    }

    if let (Some(denied), Some(nationality)) = (&policy.denied_nationalities, &nationality) {
        if denied.contains(nationality) {
            return Some(Ineligibility::NationalityDenied {
                nationality: nationality.clone(),
            });
        }
    }

    let low_confidence_fields = fields.low_confidence(low_confidence_threshold).len();
    if low_confidence_fields > MAX_LOW_CONFIDENCE_FIELDS {
        return Some(Ineligibility::InsufficientDocumentQuality {
            low_confidence_fields,
            threshold: low_confidence_threshold,
        });
    }

    // An empty check list carries no evidence either way.
    if !checks.is_empty() {
        let passed = checks.iter().filter(|check| check.passed).count();
        let pass_rate = passed as f64 / checks.len() as f64;
        if pass_rate < MINIMUM_PASS_RATE {
            return Some(Ineligibility::LowPassRate { pass_rate });
        }
    }

    None
}
