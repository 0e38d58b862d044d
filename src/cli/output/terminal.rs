//! Terminal output formatting with colors

use colored::Colorize;
use std::time::Duration;

use super::ReportRenderer;
use crate::checks::results::{CheckReport, Finding, ScanResults, Status};
use crate::error::CloudLensError;
use crate::inventory::CollectionStatus;
use crate::utils::timing::format_duration;

pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn format_header(&self, results: &ScanResults) -> String {
        format!(
            r#"
{} v{}

{} {}
{} {}
{} {}
"#,
            "cloudlens".cyan().bold(),
            env!("CARGO_PKG_VERSION"),
            "Account:".dimmed(),
            results.account_id.white().bold(),
            "Primary region:".dimmed(),
            results.primary_region.yellow(),
            "Regions:".dimmed(),
            results.regions.len()
        )
    }

    fn format_reports(&self, results: &ScanResults) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{}\n{}\n\n",
            "━".repeat(50).dimmed(),
            "  SCAN RESULTS".bold()
        ));

        if results.reports().is_empty() {
            output.push_str(&format!("  {}\n", "No checks were evaluated.".dimmed()));
            return output;
        }

        for report in results.reports() {
            output.push_str(&self.format_report(report));
            output.push('\n');
        }

        output
    }

    fn format_report(&self, report: &CheckReport) -> String {
        let glyph = if report.findings.has_failures() {
            "❌".to_string()
        } else {
            "✅".to_string()
        };

        let mut output = format!(
            "{} {} ({})\n",
            glyph,
            report.check_id.cyan().bold(),
            report.severity.to_string().yellow()
        );

        if report.findings.is_empty() {
            output.push_str(&format!("  {}\n", "No resources in scope.".dimmed()));
            return output;
        }

        for finding in report.findings.iter() {
            output.push_str(&self.format_finding(finding));
        }

        output
    }

    fn format_finding(&self, finding: &Finding) -> String {
        let status = match finding.status {
            Status::Pass => "PASS".green().bold(),
            Status::Fail => "FAIL".red().bold(),
        };

        let mut output = format!(
            "  {} [{}] {}\n",
            "•".dimmed(),
            status,
            finding.status_extended
        );

        output.push_str(&format!(
            "    {} {}\n",
            "└─".dimmed(),
            format!("{} · {}", finding.region, finding.resource_arn).dimmed()
        ));

        output
    }

    fn format_notices(&self, results: &ScanResults) -> String {
        let mut output = String::new();

        if results.region_notices().is_empty() && results.check_failures().is_empty() {
            return output;
        }

        output.push_str(&format!(
            "\n{}\n{}\n\n",
            "━".repeat(50).dimmed(),
            "  COVERAGE GAPS".bold()
        ));

        for notice in results.region_notices() {
            let label = match notice.status {
                CollectionStatus::Complete => "complete",
                CollectionStatus::Partial => "partial",
                CollectionStatus::Skipped => "skipped",
            };
            output.push_str(&format!(
                "  {} [{}] {} in {}\n",
                "•".dimmed(),
                label.yellow(),
                notice.service,
                notice.region
            ));
            if let Some(detail) = &notice.detail {
                output.push_str(&format!("    {} {}\n", "└─".dimmed(), detail.dimmed()));
            }
        }

        for failure in results.check_failures() {
            output.push_str(&format!(
                "  {} [{}] {}\n",
                "•".dimmed(),
                "error".red(),
                failure.check_id
            ));
            output.push_str(&format!(
                "    {} {}\n",
                "└─".dimmed(),
                failure.error.dimmed()
            ));
        }

        output
    }

    fn format_summary(&self, results: &ScanResults) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{}\n{}\n\n",
            "━".repeat(50).dimmed(),
            "  SUMMARY".bold()
        ));

        let passed = results.count_by_status(Status::Pass);
        let failed = results.count_by_status(Status::Fail);

        output.push_str(&format!(
            "Passed: {} │ Failed: {} │ Duration: {}\n",
            passed.to_string().green().bold(),
            failed.to_string().red().bold(),
            format_duration(Duration::from_millis(results.duration_ms))
        ));

        if failed > 0 {
            output.push_str(&format!(
                "\n{} {} finding(s) require attention.\n",
                "⚠️ ".yellow(),
                failed
            ));
        }

        if !results.is_complete() {
            output.push_str(&format!(
                "\n{} Scan was incomplete; some regions or checks did not finish.\n",
                "⚠️ ".yellow()
            ));
        }

        output
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TerminalOutput {
    fn render_report(&self, results: &ScanResults) -> Result<String, CloudLensError> {
        let mut output = String::new();

        output.push_str(&self.format_header(results));
        output.push_str(&self.format_reports(results));
        output.push_str(&self.format_notices(results));
        output.push_str(&self.format_summary(results));

        Ok(output)
    }
}
