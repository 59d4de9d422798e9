use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// One datum read off a document together with the extractor's reliability score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub value: String,
    /// 0-100; 0 means the extractor could not find or read the field.
    #[serde(deserialize_with = "deserialize_confidence")]
    pub confidence: u8,
}

impl ExtractedField {
    pub fn new(value: impl Into<String>, confidence: u8) -> Self {
        Self {
            value: value.into(),
            confidence: confidence.min(100),
        }
    }

    fn present_value(&self) -> Option<&str> {
        let trimmed = self.value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(self.value.as_str())
        }
    }
}

fn deserialize_confidence<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("confidence must be a finite number"));
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

/// Field names the upstream analyzer is expected to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    DocumentType,
    DocumentNumber,
    FirstName,
    LastName,
    FullName,
    DateOfBirth,
    Nationality,
    IssuingCountry,
    IssueDate,
    ExpiryDate,
    Sex,
    PlaceOfBirth,
    MrzLine1,
    MrzLine2,
    MrzLine3,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::DocumentType => "documentType",
            FieldKey::DocumentNumber => "documentNumber",
            FieldKey::FirstName => "firstName",
            FieldKey::LastName => "lastName",
            FieldKey::FullName => "fullName",
            FieldKey::DateOfBirth => "dateOfBirth",
            FieldKey::Nationality => "nationality",
            FieldKey::IssuingCountry => "issuingCountry",
            FieldKey::IssueDate => "issueDate",
            FieldKey::ExpiryDate => "expiryDate",
            FieldKey::Sex => "sex",
            FieldKey::PlaceOfBirth => "placeOfBirth",
            FieldKey::MrzLine1 => "mrzLine1",
            FieldKey::MrzLine2 => "mrzLine2",
            FieldKey::MrzLine3 => "mrzLine3",
        }
    }
}

/// Named fields extracted from one document. Keys outside [`FieldKey`] are kept verbatim.
///
/// A key mapped to `null` in JSON is treated the same as a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractedFields {
    fields: BTreeMap<String, ExtractedField>,
}

impl<'de> Deserialize<'de> for ExtractedFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Option<ExtractedField>>::deserialize(deserializer)?;
        let fields = raw
            .into_iter()
            .filter_map(|(key, field)| field.map(|field| (key, field)))
            .collect();
        Ok(Self { fields })
    }
}

impl ExtractedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert for a well-known key.
    pub fn with(mut self, key: FieldKey, value: impl Into<String>, confidence: u8) -> Self {
        self.insert(key.as_str(), ExtractedField::new(value, confidence));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, field: ExtractedField) {
        self.fields.insert(key.into(), field);
    }

    pub fn remove(&mut self, key: FieldKey) -> Option<ExtractedField> {
        self.fields.remove(key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&ExtractedField> {
        self.fields.get(key)
    }

    pub fn field(&self, key: FieldKey) -> Option<&ExtractedField> {
        self.get(key.as_str())
    }

    /// Value of a field, or `None` when the key is missing or blank.
    pub fn value(&self, key: FieldKey) -> Option<&str> {
        self.field(key).and_then(ExtractedField::present_value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtractedField)> {
        self.fields.iter().map(|(key, field)| (key.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of every present field whose confidence is strictly below `threshold`.
    pub fn low_confidence(&self, threshold: u8) -> Vec<&str> {
        self.iter()
            .filter(|(_, field)| field.confidence < threshold)
            .map(|(key, _)| key)
            .collect()
    }

    /// `fullName` when extracted, otherwise `"firstName lastName"` trimmed.
    pub fn display_name(&self) -> Option<String> {
        if let Some(full) = self.value(FieldKey::FullName) {
            return Some(full.to_string());
        }

        let first = self.value(FieldKey::FirstName)?;
        let last = self.value(FieldKey::LastName).unwrap_or("");
        Some(format!("{first} {last}").trim().to_string())
    }
}

/// Applicant-declared details used as ground truth for comparison checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantClaim {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub passport_number: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub intended_visa_type: Option<String>,
}

impl ApplicantClaim {
    pub fn name(&self) -> Option<&str> {
        present(&self.name)
    }

    pub fn date_of_birth(&self) -> Option<&str> {
        present(&self.date_of_birth)
    }

    pub fn passport_number(&self) -> Option<&str> {
        present(&self.passport_number)
    }

    pub fn nationality(&self) -> Option<&str> {
        present(&self.nationality)
    }

    pub fn intended_visa_type(&self) -> Option<&str> {
        present(&self.intended_visa_type)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|value| !value.trim().is_empty())
}

/// Controlled vocabulary for check names. Downstream consumers match on these literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckField {
    ExpiryDate,
    IssueDate,
    Name,
    DateOfBirth,
    Age,
    DocumentNumber,
    Nationality,
    MrzChecksum,
    DocumentType,
    Confidence,
}

impl CheckField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckField::ExpiryDate => "expiryDate",
            CheckField::IssueDate => "issueDate",
            CheckField::Name => "name",
            CheckField::DateOfBirth => "dateOfBirth",
            CheckField::Age => "age",
            CheckField::DocumentNumber => "documentNumber",
            CheckField::Nationality => "nationality",
            CheckField::MrzChecksum => "mrzChecksum",
            CheckField::DocumentType => "documentType",
            CheckField::Confidence => "confidence",
        }
    }

    /// Failures on these fields block eligibility when a valid passport is required.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            CheckField::ExpiryDate
                | CheckField::DocumentNumber
                | CheckField::DateOfBirth
                | CheckField::Name
        )
    }
}

/// Outcome of a single rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub field: CheckField,
    pub passed: bool,
    pub message: String,
}

impl ValidationCheck {
    pub fn passed(field: CheckField, message: impl Into<String>) -> Self {
        Self {
            field,
            passed: true,
            message: message.into(),
        }
    }

    pub fn failed(field: CheckField, message: impl Into<String>) -> Self {
        Self {
            field,
            passed: false,
            message: message.into(),
        }
    }
}

/// Eligibility verdict for the requested visa category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub eligible: bool,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visa_type: Option<String>,
}

/// Terminal aggregate returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub overall_confidence: u8,
    pub extracted_fields: ExtractedFields,
    pub validation_checks: Vec<ValidationCheck>,
    pub eligibility_assessment: EligibilityResult,
    pub recommended_actions: Vec<String>,
    pub summary: String,
}
