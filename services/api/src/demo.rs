use crate::infra::{build_service, parse_date};
use chrono::{Local, NaiveDate};
use clap::Args;
use docverify::config::VerificationSettings;
use docverify::error::AppError;
use docverify::verification::{
    ApplicantClaim, ExtractedFields, FieldKey, VerificationRequest, VerificationResult,
};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct VerifyArgs {
    /// JSON file holding `extractedFields` and `applicantInfo`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Evaluation date (YYYY-MM-DD). Defaults to the request's asOf, then today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// JSON policy table to load instead of the built-in policies
    #[arg(long)]
    pub(crate) policy_file: Option<PathBuf>,
    /// Verify ICAO check digits in the MRZ in addition to its structure
    #[arg(long)]
    pub(crate) mrz_check_digits: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) fn run_verify(args: VerifyArgs) -> Result<(), AppError> {
    let VerifyArgs {
        input,
        as_of,
        policy_file,
        mrz_check_digits,
    } = args;

    let service = build_service(&VerificationSettings {
        policy_file,
        mrz_check_digits,
    })?;

    let raw = fs::read_to_string(&input)?;
    let mut request: VerificationRequest = serde_json::from_str(&raw)?;
    if let Some(date) = as_of {
        request.as_of = Some(date.format("%Y-%m-%d").to_string());
    }

    let result = service.handle(request, Local::now().date_naive())?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let service = build_service(&VerificationSettings::default())?;

    println!("Document verification demo (as of {today})");

    let matching = service.verify(demo_passport(), &demo_claim("1990-01-15"), today);
    render_result("Matching application", &matching);

    let mismatching = service.verify(demo_passport(), &demo_claim("1991-01-15"), today);
    render_result("Date of birth mismatch", &mismatching);

    Ok(())
}

fn demo_passport() -> ExtractedFields {
    ExtractedFields::new()
        .with(FieldKey::FullName, "John Doe", 95)
        .with(FieldKey::DateOfBirth, "1990-01-15", 90)
        .with(FieldKey::DocumentNumber, "A12345678", 90)
        .with(FieldKey::Nationality, "USA", 92)
        .with(FieldKey::ExpiryDate, "2030-12-31", 90)
        .with(FieldKey::DocumentType, "passport", 95)
}

fn demo_claim(date_of_birth: &str) -> ApplicantClaim {
    ApplicantClaim {
        name: Some("John Doe".to_string()),
        date_of_birth: Some(date_of_birth.to_string()),
        passport_number: Some("A12345678".to_string()),
        nationality: Some("USA".to_string()),
        intended_visa_type: Some("tourist".to_string()),
    }
}

fn render_result(title: &str, result: &VerificationResult) {
    println!("\n{title}");
    println!("- Overall confidence: {}%", result.overall_confidence);
    println!("- {}", result.summary);

    let eligibility = &result.eligibility_assessment;
    println!(
        "- Eligible for {} visa: {} ({})",
        eligibility.visa_type.as_deref().unwrap_or("requested"),
        if eligibility.eligible { "yes" } else { "no" },
        eligibility.reason
    );

    println!("Validation checks:");
    for check in &result.validation_checks {
        let marker = if check.passed { "pass" } else { "FAIL" };
        println!("  - [{marker}] {}: {}", check.field.as_str(), check.message);
    }

    println!("Recommended actions:");
    for action in &result.recommended_actions {
        println!("  - {action}");
    }
}
