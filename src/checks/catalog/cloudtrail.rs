//! CloudTrail posture checks

use crate::checks::engine::{Check, ScanInventory};
use crate::checks::results::{Finding, FindingSet, Severity};
use crate::error::CheckError;
use crate::provider::AuditContext;
use crate::services::cloudtrail::{EventFilter, Trail, SERVICE};

/// Verify the account has at least one multi-region trail that is logging
/// and recording management events.
///
/// This is an account-level check: however many trails exist, it emits
/// exactly one finding per scan. A PASS names a representative qualifying
/// trail; a FAIL is attributed to the account itself.
pub struct MultiRegionTrailLoggingManagementEvents;

pub const CHECK_ID: &str = "cloudtrail_multi_region_enabled_logging_management_events";

/// Does this trail's event filter record management events?
///
/// A trail with no filter records nothing. Classic selectors answer with
/// their management-events flag; the read/write scope is informational and
/// never gates coverage. Advanced selectors cover management events when
/// any `eventCategory` condition includes the exact value `Management`.
fn covers_management_events(trail: &Trail) -> bool {
    match &trail.event_filter {
        None => false,
        Some(EventFilter::Classic {
            include_management_events,
            ..
        }) => *include_management_events,
        Some(EventFilter::Advanced { field_selectors }) => field_selectors
            .iter()
            .any(|fs| fs.field == "eventCategory" && fs.equals_values.contains("Management")),
    }
}

fn qualifies(trail: &Trail) -> bool {
    trail.is_multi_region && trail.is_logging && covers_management_events(trail)
}

impl Check for MultiRegionTrailLoggingManagementEvents {
    fn id(&self) -> &'static str {
        CHECK_ID
    }

    fn service(&self) -> &'static str {
        SERVICE
    }

    fn title(&self) -> &'static str {
        "Ensure a multi-region trail is logging management events"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn execute(
        &self,
        inventory: &ScanInventory,
        ctx: &dyn AuditContext,
    ) -> Result<FindingSet, CheckError> {
        let trails = inventory.cloudtrail()?;
        let mut findings = FindingSet::builder();

        // Inventory order is (home_region, name). A qualifying trail homed
        // in the primary region wins; failing that, the first qualifying
        // trail in that order stands for the account.
        let mut representative: Option<&Trail> = None;
        for trail in trails.resources().filter(|t| qualifies(t)) {
            if trail.home_region == ctx.primary_region() {
                representative = Some(trail);
                break;
            }
            if representative.is_none() {
                representative = Some(trail);
            }
        }

        match representative {
            Some(trail) => findings.push(Finding::pass(
                &trail.name,
                &trail.arn,
                ctx.primary_region(),
                format!(
                    "Trail {} from home region {} is multi-region, is logging and have management events enabled.",
                    trail.name, trail.home_region
                ),
            )),
            None => findings.push(Finding::fail(
                ctx.account_id(),
                ctx.account_arn(),
                ctx.primary_region(),
                "No trail found with multi-region enabled and logging management events.",
            )),
        }

        Ok(findings.seal())
    }
}
