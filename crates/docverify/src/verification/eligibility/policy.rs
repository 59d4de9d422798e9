use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const STANDARD_FALLBACK: &str = "tourist";

/// Requirements an applicant must satisfy for one visa category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityPolicy {
    pub visa_type: String,
    pub min_age: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i32>,
    pub min_passport_validity_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_nationalities: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denied_nationalities: Option<BTreeSet<String>>,
    #[serde(default = "requires_valid_passport_default")]
    pub requires_valid_passport: bool,
}

fn requires_valid_passport_default() -> bool {
    true
}

impl EligibilityPolicy {
    pub fn new(
        visa_type: impl Into<String>,
        min_age: i32,
        max_age: Option<i32>,
        min_passport_validity_months: u32,
    ) -> Self {
        Self {
            visa_type: visa_type.into(),
            min_age,
            max_age,
            min_passport_validity_months,
            allowed_nationalities: None,
            denied_nationalities: None,
            requires_valid_passport: true,
        }
    }

    fn normalized(mut self) -> Self {
        self.visa_type = self.visa_type.trim().to_lowercase();
        self.allowed_nationalities = self.allowed_nationalities.map(upper_case_set);
        self.denied_nationalities = self.denied_nationalities.map(upper_case_set);
        self
    }
}

fn upper_case_set(values: BTreeSet<String>) -> BTreeSet<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_uppercase())
        .collect()
}

/// Errors raised while building or loading a policy table.
#[derive(Debug, thiserror::Error)]
pub enum PolicyTableError {
    #[error("policy table must contain at least one policy")]
    Empty,
    #[error("fallback visa type '{0}' has no policy")]
    MissingFallback(String),
    #[error("visa type '{0}' is defined more than once")]
    DuplicateVisaType(String),
    #[error("visa type '{visa_type}' has minimum age {min} above maximum age {max}")]
    InvalidAgeRange { visa_type: String, min: i32, max: i32 },
    #[error("unable to read policy file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("policy file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Serialized shape of a policy table.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PolicyTableDocument {
    #[serde(default = "standard_fallback")]
    fallback: String,
    policies: Vec<EligibilityPolicy>,
}

fn standard_fallback() -> String {
    STANDARD_FALLBACK.to_string()
}

/// Immutable set of eligibility policies keyed by lower-cased visa type.
///
/// Unknown visa types resolve to the fallback policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicyTableDocument", into = "PolicyTableDocument")]
pub struct PolicyTable {
    fallback: EligibilityPolicy,
    policies: BTreeMap<String, EligibilityPolicy>,
}

impl PolicyTable {
    pub fn new(
        policies: Vec<EligibilityPolicy>,
        fallback: &str,
    ) -> Result<Self, PolicyTableError> {
        if policies.is_empty() {
            return Err(PolicyTableError::Empty);
        }

        let mut table = BTreeMap::new();
        for policy in policies.into_iter().map(EligibilityPolicy::normalized) {
            if let Some(max) = policy.max_age {
                if policy.min_age > max {
                    return Err(PolicyTableError::InvalidAgeRange {
                        visa_type: policy.visa_type,
                        min: policy.min_age,
                        max,
                    });
                }
            }
            if table.contains_key(&policy.visa_type) {
                return Err(PolicyTableError::DuplicateVisaType(policy.visa_type));
            }
            table.insert(policy.visa_type.clone(), policy);
        }

        let fallback_key = fallback.trim().to_lowercase();
        let fallback = table
            .get(&fallback_key)
            .cloned()
            .ok_or(PolicyTableError::MissingFallback(fallback_key))?;

        Ok(Self {
            fallback,
            policies: table,
        })
    }

    /// Built-in policies for the five supported visa categories.
    pub fn standard() -> Self {
        let policies = [
            EligibilityPolicy::new("tourist", 18, None, 6),
            EligibilityPolicy::new("business", 21, None, 6),
            EligibilityPolicy::new("student", 16, Some(35), 12),
            EligibilityPolicy::new("work", 18, Some(65), 12),
            EligibilityPolicy::new("transit", 18, None, 3),
        ];
        let fallback = policies[0].clone();
        Self {
            fallback,
            policies: policies
                .into_iter()
                .map(|policy| (policy.visa_type.clone(), policy))
                .collect(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, PolicyTableError> {
        let document: PolicyTableDocument = serde_json::from_str(raw)?;
        Self::try_from(document)
    }

    pub fn from_path(path: &Path) -> Result<Self, PolicyTableError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PolicyTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn get(&self, visa_type: &str) -> Option<&EligibilityPolicy> {
        self.policies.get(&visa_type.trim().to_lowercase())
    }

    /// Policy for the requested visa type, or the fallback when unknown or absent.
    pub fn resolve(&self, requested: Option<&str>) -> &EligibilityPolicy {
        requested
            .and_then(|visa_type| self.get(visa_type))
            .unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &EligibilityPolicy {
        &self.fallback
    }

    pub fn policies(&self) -> impl Iterator<Item = &EligibilityPolicy> {
        self.policies.values()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<PolicyTableDocument> for PolicyTable {
    type Error = PolicyTableError;

    fn try_from(document: PolicyTableDocument) -> Result<Self, Self::Error> {
        Self::new(document.policies, &document.fallback)
    }
}

impl From<PolicyTable> for PolicyTableDocument {
    fn from(table: PolicyTable) -> Self {
        Self {
            fallback: table.fallback.visa_type,
            policies: table.policies.into_values().collect(),
        }
    }
}
