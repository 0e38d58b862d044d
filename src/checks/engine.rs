//! Check evaluation engine
//!
//! Collection and evaluation are two phases with a hard seam between them:
//! the engine first gathers every service inventory the selected checks
//! need (concurrently, under one cancellation token), then evaluates each
//! check as a pure function over that immutable snapshot. A check error
//! never touches other checks; only an account with no readable region at
//! all aborts the scan.

use std::time::Instant;

use tracing::{debug, info, span, Level};

use tokio_util::sync::CancellationToken;

use super::catalog;
use super::results::{CheckReport, FindingSet, RegionNotice, ScanResults, Severity, Status};
use crate::config::Config;
use crate::error::{CheckError, CloudLensError, ScanError};
use crate::inventory::{CollectionStatus, ServiceInventory};
use crate::provider::AuditContext;
use crate::services::cloudtrail::Trail;
use crate::services::ecs::TaskDefinition;
use crate::services::{cloudtrail, ecs};
use crate::utils::timing::format_duration;

/// Trait for posture checks
///
/// `execute` is synchronous on purpose: all provider IO happens during
/// collection, so evaluating a check is a deterministic function of the
/// snapshot and the audit context. Running a check twice over the same
/// snapshot yields the same findings.
pub trait Check: Send + Sync {
    /// Stable check identifier (e.g.
    /// `cloudtrail_multi_region_enabled_logging_management_events`)
    fn id(&self) -> &'static str;

    /// Service whose inventory this check evaluates
    fn service(&self) -> &'static str;

    /// Human-readable one-line title
    fn title(&self) -> &'static str;

    /// Severity attached to every finding this check emits
    fn severity(&self) -> Severity;

    /// Evaluate the check over the collected snapshot
    fn execute(
        &self,
        inventory: &ScanInventory,
        ctx: &dyn AuditContext,
    ) -> Result<FindingSet, CheckError>;
}

/// The immutable per-service snapshots one scan evaluated
///
/// A service the scan did not collect is `None`; a check asking for it gets
/// a [`CheckError::MissingInventory`], which fails that check only.
pub struct ScanInventory {
    cloudtrail: Option<ServiceInventory<Trail>>,
    ecs: Option<ServiceInventory<TaskDefinition>>,
}

impl ScanInventory {
    pub fn new(
        cloudtrail: Option<ServiceInventory<Trail>>,
        ecs: Option<ServiceInventory<TaskDefinition>>,
    ) -> Self {
        Self { cloudtrail, ecs }
    }

    pub fn cloudtrail(&self) -> Result<&ServiceInventory<Trail>, CheckError> {
        self.cloudtrail.as_ref().ok_or(CheckError::MissingInventory {
            service: cloudtrail::SERVICE,
        })
    }

    pub fn ecs(&self) -> Result<&ServiceInventory<TaskDefinition>, CheckError> {
        self.ecs.as_ref().ok_or(CheckError::MissingInventory {
            service: ecs::SERVICE,
        })
    }

    /// Degraded regions across all collected services, for result notices
    fn notices(&self) -> Vec<RegionNotice> {
        let mut notices = Vec::new();
        if let Some(inv) = &self.cloudtrail {
            push_notices(&mut notices, inv);
        }
        if let Some(inv) = &self.ecs {
            push_notices(&mut notices, inv);
        }
        notices
    }

    /// True when at least one service was collected and none of them could
    /// read a single region
    fn nothing_reachable(&self) -> bool {
        let mut any = false;
        let mut all_skipped = true;
        if let Some(inv) = &self.cloudtrail {
            any = true;
            all_skipped &= inv.all_regions_skipped();
        }
        if let Some(inv) = &self.ecs {
            any = true;
            all_skipped &= inv.all_regions_skipped();
        }
        any && all_skipped
    }
}

fn push_notices<T: crate::inventory::Resource>(
    notices: &mut Vec<RegionNotice>,
    inv: &ServiceInventory<T>,
) {
    for report in inv.region_reports() {
        if report.status != CollectionStatus::Complete {
            notices.push(RegionNotice {
                service: inv.service().to_string(),
                region: report.region.clone(),
                status: report.status,
                detail: report.detail.clone(),
            });
        }
    }
}

/// Main check evaluation engine
pub struct CheckEngine {
    config: Config,
    only_checks: Option<Vec<String>>,
    skip_checks: Option<Vec<String>>,
}

impl CheckEngine {
    /// Create a new check engine with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            only_checks: None,
            skip_checks: None,
        }
    }

    /// Set checks to exclusively run
    pub fn set_only_checks(&mut self, checks: Vec<String>) {
        self.only_checks = Some(checks);
    }

    /// Set checks to skip
    pub fn set_skip_checks(&mut self, checks: Vec<String>) {
        self.skip_checks = Some(checks);
    }

    /// Check if a check should be run
    ///
    /// `--only` wins over `--skip`; a check disabled in the config file
    /// never runs unless `--only` names it explicitly.
    fn should_run_check(&self, check_id: &str) -> bool {
        if let Some(only) = &self.only_checks {
            return only.iter().any(|c| c == check_id);
        }

        if let Some(skip) = &self.skip_checks {
            if skip.iter().any(|c| c == check_id) {
                return false;
            }
        }

        self.config.is_check_enabled(check_id)
    }

    /// Collect the needed inventories, then evaluate all selected checks
    pub async fn run(
        &self,
        ctx: &dyn AuditContext,
        cancel: &CancellationToken,
    ) -> Result<ScanResults, CloudLensError> {
        info!(
            account = %ctx.account_id(),
            regions = ctx.regions().len(),
            "Starting scan"
        );

        if ctx.regions().is_empty() {
            return Err(ScanError::NoRegions.into());
        }

        let started = Instant::now();
        let mut results = ScanResults::new(
            ctx.account_id(),
            ctx.account_arn(),
            ctx.primary_region(),
        );
        results.set_regions(ctx.regions().to_vec());

        let checks: Vec<Box<dyn Check>> = catalog::all()
            .into_iter()
            .filter(|c| {
                let selected = self.should_run_check(c.id());
                if !selected {
                    debug!(check = c.id(), "Skipping check");
                }
                selected
            })
            .collect();

        let inventory = self.collect_inventories(ctx, cancel, &checks).await;
        if inventory.nothing_reachable() {
            return Err(ScanError::NoReachableRegions {
                attempted: ctx.regions().len(),
            }
            .into());
        }
        results.add_notices(inventory.notices());

        for check in &checks {
            let check_id = check.id();
            let span = span!(Level::INFO, "check", check = check_id, account = %ctx.account_id());
            let _guard = span.enter();

            debug!(check = check_id, "Running check");

            match check.execute(&inventory, ctx) {
                Ok(findings) => {
                    debug!(
                        check = check_id,
                        findings_count = findings.len(),
                        "Check completed"
                    );
                    results.add_report(CheckReport {
                        check_id: check_id.to_string(),
                        service: check.service().to_string(),
                        title: check.title().to_string(),
                        severity: check.severity(),
                        findings,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        check = check_id,
                        error = %e,
                        "Error running check"
                    );
                    results.record_check_failure(check_id, e.to_string());
                }
            }
        }

        results.set_duration(started.elapsed());
        info!(
            "Scan complete in {}: {} passed, {} failed across {} checks",
            format_duration(started.elapsed()),
            results.count_by_status(Status::Pass),
            results.count_by_status(Status::Fail),
            results.reports().len(),
        );

        Ok(results)
    }

    /// Collect every service inventory the selected checks need, in parallel
    async fn collect_inventories(
        &self,
        ctx: &dyn AuditContext,
        cancel: &CancellationToken,
        checks: &[Box<dyn Check>],
    ) -> ScanInventory {
        let need_cloudtrail = checks.iter().any(|c| c.service() == cloudtrail::SERVICE);
        let need_ecs = checks.iter().any(|c| c.service() == ecs::SERVICE);

        let (trail_inv, ecs_inv) = tokio::join!(
            async {
                if need_cloudtrail {
                    Some(cloudtrail::collect(ctx, cancel).await)
                } else {
                    None
                }
            },
            async {
                if need_ecs {
                    Some(ecs::collect(ctx, cancel).await)
                } else {
                    None
                }
            },
        );

        ScanInventory::new(trail_inv, ecs_inv)
    }
}
