use serde::{Deserialize, Serialize};

/// Thresholds applied by the document validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub low_confidence_threshold: u8,
    pub expiry_warning_months: u32,
    pub minimum_age: i32,
    pub maximum_age_exclusive: i32,
    pub name_similarity_threshold: f64,
    pub mrz_check_digits: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: 60,
            expiry_warning_months: 6,
            minimum_age: 18,
            maximum_age_exclusive: 120,
            name_similarity_threshold: 0.7,
            mrz_check_digits: false,
        }
    }
}
