//! # Scan Result Structures
//!
//! This module defines the data structures for representing check findings
//! and scan results.
//!
//! ## Overview
//!
//! - [`Status`] - Finding verdicts (PASS, FAIL)
//! - [`Severity`] - Check severity levels (Critical, High, Medium, Low)
//! - [`Finding`] - Individual verdict for one evaluated unit
//! - [`FindingSet`] - Sealed, ordered findings from one check
//! - [`ScanResults`] - Everything a scan produced, with query helpers
//!
//! ## Examples
//!
//! ### Creating Findings
//!
//! ```rust
//! use cloudlens::checks::results::Finding;
//!
//! let finding = Finding::fail(
//!     "123456789012",
//!     "arn:aws:iam::123456789012:root",
//!     "us-east-1",
//!     "No trail found with multi-region enabled and logging management events.",
//! );
//! assert_eq!(finding.status.as_str(), "FAIL");
//! ```
//!
//! ### Working with Scan Results
//!
//! ```rust
//! use cloudlens::checks::results::{CheckReport, Finding, FindingSet, ScanResults, Severity, Status};
//!
//! let mut findings = FindingSet::builder();
//! findings.push(Finding::pass("trail", "arn:aws:cloudtrail:eu-west-1:1:trail/t", "eu-west-1", "ok"));
//!
//! let mut results = ScanResults::new("123456789012", "arn:aws:iam::123456789012:root", "us-east-1");
//! results.add_report(CheckReport {
//!     check_id: "cloudtrail_multi_region_enabled_logging_management_events".to_string(),
//!     service: "cloudtrail".to_string(),
//!     title: "Multi-region trail logging management events".to_string(),
//!     severity: Severity::High,
//!     findings: findings.seal(),
//! });
//!
//! assert!(!results.has_failures());
//! assert_eq!(results.count_by_status(Status::Pass), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::inventory::CollectionStatus;

/// Verdict for one evaluated unit.
///
/// Serialized exactly as `"PASS"` / `"FAIL"`; downstream tooling matches on
/// these strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity levels for checks.
///
/// Severity belongs to the check, not the finding: every finding a check
/// emits carries the check's severity in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Exploitable exposure (e.g. plaintext secrets).
    Critical,
    /// Major posture gap (e.g. no management-event audit log).
    High,
    /// Hardening opportunity.
    Medium,
    /// Informational.
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single verdict for one evaluated unit.
///
/// The evaluated unit is whatever the check's aggregation policy says it is:
/// one resource for per-resource checks, the whole account for account-level
/// checks. Field names in serialized form are part of the published
/// interface (`resourceId`, `resourceArn`, `region`, `status`,
/// `statusExtended`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Identifier of the evaluated unit (resource name, or account id for
    /// account-level findings).
    pub resource_id: String,

    /// ARN of the evaluated unit (account root ARN for account-level
    /// findings).
    pub resource_arn: String,

    /// Region the verdict is attributed to. Account-level findings use the
    /// scan's primary region.
    pub region: String,

    /// The verdict.
    pub status: Status,

    /// Human-readable explanation of the verdict. Templates are fixed per
    /// check and stable across releases.
    pub status_extended: String,
}

impl Finding {
    /// Create a PASS finding
    pub fn pass(
        resource_id: impl Into<String>,
        resource_arn: impl Into<String>,
        region: impl Into<String>,
        status_extended: impl Into<String>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            resource_arn: resource_arn.into(),
            region: region.into(),
            status: Status::Pass,
            status_extended: status_extended.into(),
        }
    }

    /// Create a FAIL finding
    pub fn fail(
        resource_id: impl Into<String>,
        resource_arn: impl Into<String>,
        region: impl Into<String>,
        status_extended: impl Into<String>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            resource_arn: resource_arn.into(),
            region: region.into(),
            status: Status::Fail,
            status_extended: status_extended.into(),
        }
    }
}

/// Findings from one check, sealed after evaluation.
///
/// Checks accumulate findings through [`FindingSetBuilder`] (append-only)
/// and seal the set when done; nothing mutates a finding afterwards.
/// Serializes as a plain array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FindingSet {
    findings: Vec<Finding>,
}

impl FindingSet {
    pub fn builder() -> FindingSetBuilder {
        FindingSetBuilder {
            findings: Vec::new(),
        }
    }

    /// Findings in the order the check emitted them
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn count_by_status(&self, status: Status) -> usize {
        self.findings.iter().filter(|f| f.status == status).count()
    }

    pub fn has_failures(&self) -> bool {
        self.findings.iter().any(|f| f.status == Status::Fail)
    }
}

/// Append-only accumulator for a check's findings
#[derive(Debug)]
pub struct FindingSetBuilder {
    findings: Vec<Finding>,
}

impl FindingSetBuilder {
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn seal(self) -> FindingSet {
        FindingSet {
            findings: self.findings,
        }
    }
}

/// One check's identity and its sealed findings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub check_id: String,
    pub service: String,
    pub title: String,
    pub severity: Severity,
    pub findings: FindingSet,
}

/// A region that was not collected in full for one service
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionNotice {
    pub service: String,
    pub region: String,
    pub status: CollectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A check that errored instead of producing findings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFailure {
    pub check_id: String,
    pub error: String,
}

/// Everything one scan produced.
///
/// `region_notices` carries only degraded regions (skipped or partial); a
/// fully collected scan has none. [`ScanResults::is_complete`] is false as
/// soon as any notice or check failure exists, which drives the
/// incomplete-scan exit code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResults {
    /// Account that was scanned.
    pub account_id: String,

    /// Root ARN of the scanned account.
    pub account_arn: String,

    /// Region account-level findings are attributed to.
    pub primary_region: String,

    /// Regions the scan targeted, in collection order.
    pub regions: Vec<String>,

    /// When the scan started.
    pub started_at: DateTime<Utc>,

    /// Wall-clock scan duration in milliseconds.
    pub duration_ms: u64,

    reports: Vec<CheckReport>,
    region_notices: Vec<RegionNotice>,
    check_failures: Vec<CheckFailure>,
}

impl ScanResults {
    /// Create empty results stamped with the scan start time
    pub fn new(
        account_id: impl Into<String>,
        account_arn: impl Into<String>,
        primary_region: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            account_arn: account_arn.into(),
            primary_region: primary_region.into(),
            regions: Vec::new(),
            started_at: Utc::now(),
            duration_ms: 0,
            reports: Vec::new(),
            region_notices: Vec::new(),
            check_failures: Vec::new(),
        }
    }

    pub fn set_regions(&mut self, regions: Vec<String>) {
        self.regions = regions;
    }

    pub fn add_report(&mut self, report: CheckReport) {
        self.reports.push(report);
    }

    pub fn add_notices(&mut self, notices: impl IntoIterator<Item = RegionNotice>) {
        self.region_notices.extend(notices);
    }

    pub fn record_check_failure(&mut self, check_id: impl Into<String>, error: impl Into<String>) {
        self.check_failures.push(CheckFailure {
            check_id: check_id.into(),
            error: error.into(),
        });
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_ms = duration.as_millis() as u64;
    }

    pub fn reports(&self) -> &[CheckReport] {
        &self.reports
    }

    pub fn region_notices(&self) -> &[RegionNotice] {
        &self.region_notices
    }

    pub fn check_failures(&self) -> &[CheckFailure] {
        &self.check_failures
    }

    /// All findings across all checks, in report order
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.reports.iter().flat_map(|r| r.findings.iter())
    }

    pub fn total_findings(&self) -> usize {
        self.reports.iter().map(|r| r.findings.len()).sum()
    }

    pub fn count_by_status(&self, status: Status) -> usize {
        self.reports
            .iter()
            .map(|r| r.findings.count_by_status(status))
            .sum()
    }

    /// Any FAIL verdict anywhere in the scan
    pub fn has_failures(&self) -> bool {
        self.reports.iter().any(|r| r.findings.has_failures())
    }

    /// True when every region was collected in full and every selected
    /// check ran to completion
    pub fn is_complete(&self) -> bool {
        self.region_notices.is_empty() && self.check_failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(id: &str) -> Finding {
        Finding::pass(id, format!("arn:{id}"), "eu-west-1", "ok")
    }

    fn fail(id: &str) -> Finding {
        Finding::fail(id, format!("arn:{id}"), "eu-west-1", "not ok")
    }

    fn report(check_id: &str, findings: Vec<Finding>) -> CheckReport {
        let mut builder = FindingSet::builder();
        for finding in findings {
            builder.push(finding);
        }
        CheckReport {
            check_id: check_id.to_string(),
            service: "cloudtrail".to_string(),
            title: "Test check".to_string(),
            severity: Severity::High,
            findings: builder.seal(),
        }
    }

    #[test]
    fn test_status_serializes_exact_strings() {
        assert_eq!(serde_json::to_string(&Status::Pass).unwrap(), "\"PASS\"");
        assert_eq!(serde_json::to_string(&Status::Fail).unwrap(), "\"FAIL\"");
    }

    #[test]
    fn test_finding_constructors() {
        let finding = Finding::pass("r", "arn:r", "eu-west-1", "fine");
        assert_eq!(finding.status, Status::Pass);
        assert_eq!(finding.resource_id, "r");

        let finding = Finding::fail("r", "arn:r", "eu-west-1", "broken");
        assert_eq!(finding.status, Status::Fail);
        assert_eq!(finding.status_extended, "broken");
    }

    #[test]
    fn test_finding_serializes_camel_case() {
        let finding = Finding::fail("r", "arn:r", "eu-west-1", "broken");
        let json = serde_json::to_value(&finding).unwrap();

        assert_eq!(json["resourceId"], "r");
        assert_eq!(json["resourceArn"], "arn:r");
        assert_eq!(json["region"], "eu-west-1");
        assert_eq!(json["status"], "FAIL");
        assert_eq!(json["statusExtended"], "broken");
    }

    #[test]
    fn test_finding_set_preserves_emit_order() {
        let mut builder = FindingSet::builder();
        builder.push(fail("b"));
        builder.push(pass("a"));
        let set = builder.seal();

        let ids: Vec<_> = set.iter().map(|f| f.resource_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(set.count_by_status(Status::Fail), 1);
        assert!(set.has_failures());
    }

    #[test]
    fn test_scan_results_queries() {
        let mut results = ScanResults::new("123456789012", "arn:root", "us-east-1");
        results.add_report(report("check_a", vec![pass("x"), fail("y")]));
        results.add_report(report("check_b", vec![pass("z")]));

        assert_eq!(results.total_findings(), 3);
        assert_eq!(results.count_by_status(Status::Pass), 2);
        assert_eq!(results.count_by_status(Status::Fail), 1);
        assert!(results.has_failures());
        assert!(results.is_complete());
    }

    #[test]
    fn test_scan_results_incomplete_on_notice_or_check_failure() {
        let mut results = ScanResults::new("123456789012", "arn:root", "us-east-1");
        assert!(results.is_complete());

        results.add_notices(vec![RegionNotice {
            service: "ecs".to_string(),
            region: "ap-south-1".to_string(),
            status: CollectionStatus::Skipped,
            detail: Some("expired token".to_string()),
        }]);
        assert!(!results.is_complete());

        let mut results = ScanResults::new("123456789012", "arn:root", "us-east-1");
        results.record_check_failure("check_a", "no 'ecs' inventory was collected for this scan");
        assert!(!results.is_complete());
    }

    #[test]
    fn test_duration_is_recorded_in_milliseconds() {
        let mut results = ScanResults::new("123456789012", "arn:root", "us-east-1");
        results.set_duration(Duration::from_millis(1500));
        assert_eq!(results.duration_ms, 1500);
    }
}
