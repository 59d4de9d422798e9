mod common;
mod eligibility;
mod report;
