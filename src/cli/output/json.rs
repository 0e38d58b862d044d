//! JSON output formatting

use serde::Serialize;

use super::ReportRenderer;
use crate::checks::results::{ScanResults, Status};
use crate::error::CloudLensError;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportOutput<'a> {
    version: &'static str,
    #[serde(flatten)]
    results: &'a ScanResults,
    summary: Summary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    total_findings: usize,
    passed: usize,
    failed: usize,
    complete: bool,
}

impl ReportRenderer for JsonOutput {
    fn render_report(&self, results: &ScanResults) -> Result<String, CloudLensError> {
        let output = ReportOutput {
            version: env!("CARGO_PKG_VERSION"),
            results,
            summary: Summary {
                total_findings: results.total_findings(),
                passed: results.count_by_status(Status::Pass),
                failed: results.count_by_status(Status::Fail),
                complete: results.is_complete(),
            },
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}
