use chrono::NaiveDate;
use docverify::config::VerificationSettings;
use docverify::error::AppError;
use docverify::verification::{PolicyTable, ValidationConfig, VerificationService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_policy_table(path: Option<&Path>) -> Result<PolicyTable, AppError> {
    match path {
        Some(path) => {
            let table = PolicyTable::from_path(path)?;
            info!(
                path = %path.display(),
                policies = table.policies().count(),
                fallback = %table.fallback().visa_type,
                "loaded eligibility policies"
            );
            Ok(table)
        }
        None => Ok(PolicyTable::standard()),
    }
}

pub(crate) fn build_service(
    settings: &VerificationSettings,
) -> Result<VerificationService, AppError> {
    let policies = load_policy_table(settings.policy_file.as_deref())?;
    let config = ValidationConfig {
        mrz_check_digits: settings.mrz_check_digits,
        ..ValidationConfig::default()
    };
    Ok(VerificationService::new(config, policies))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
