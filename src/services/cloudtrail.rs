//! CloudTrail inventory: canonical trail records and their collection
//!
//! The provider exposes two generations of event selector config (classic
//! and advanced) with different shapes. Normalization reconciles them into
//! one [`EventFilter`] union here, exactly once, so checks never see
//! generation-specific payloads.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::NormalizationError;
use crate::inventory::{
    collect_regions, drain_pages, regional_clients, PaginationEnd, RegionSlice, Resource,
    ServiceInventory, CANCELLED_DETAIL,
};
use crate::provider::cloudtrail::{RawEventSelectors, RawTrail, RawTrailStatus};
use crate::provider::{AuditContext, CloudTrailApi};

/// Service identifier used in inventories, findings and config
pub const SERVICE: &str = "cloudtrail";

/// A trail, normalized
///
/// Identity is `(home_region, name)`: shadow copies of a multi-region trail
/// listed from other regions normalize to the same identity and collapse to
/// a single record in the inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    pub name: String,
    pub arn: String,
    pub home_region: String,
    pub is_multi_region: bool,
    pub is_logging: bool,
    /// Absent means the trail records no events at all
    pub event_filter: Option<EventFilter>,
}

impl Resource for Trail {
    fn resource_id(&self) -> &str {
        &self.name
    }

    fn region(&self) -> &str {
        &self.home_region
    }
}

/// The two event selector generations, reconciled
///
/// A trail carries one generation or the other; which one decides how
/// management-event coverage is judged.
#[derive(Debug, Clone, PartialEq)]
pub enum EventFilter {
    Classic {
        read_write_type: ReadWriteType,
        include_management_events: bool,
    },
    Advanced {
        field_selectors: Vec<FieldSelector>,
    },
}

/// One normalized field condition from an advanced selector
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSelector {
    pub field: String,
    /// Deduplicated; membership tests are exact string matches
    pub equals_values: BTreeSet<String>,
}

/// Classic selector read/write scope (informational; never gates a verdict)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadWriteType {
    All,
    ReadOnly,
    WriteOnly,
}

impl ReadWriteType {
    /// Unknown or absent values fall back to `All`; the scope never decides
    /// coverage, so guessing wide is harmless
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("ReadOnly") => Self::ReadOnly,
            Some("WriteOnly") => Self::WriteOnly,
            _ => Self::All,
        }
    }
}

/// Build a canonical [`Trail`] from the three raw payloads describing it
///
/// Requires `name`, `arn` and `home_region`; absent booleans default to
/// `false` (a trail that does not say it is logging is treated as not
/// logging). A payload carrying both selector generations violates the
/// provider contract and is rejected rather than guessed at.
pub fn normalize_trail(
    raw: RawTrail,
    status: RawTrailStatus,
    selectors: RawEventSelectors,
) -> Result<Trail, NormalizationError> {
    let name = raw.name.ok_or(NormalizationError::MissingField {
        kind: "trail",
        field: "name",
    })?;
    let arn = raw.arn.ok_or(NormalizationError::MissingField {
        kind: "trail",
        field: "arn",
    })?;
    let home_region = raw.home_region.ok_or(NormalizationError::MissingField {
        kind: "trail",
        field: "home_region",
    })?;

    let event_filter = normalize_selectors(selectors)?;

    Ok(Trail {
        name,
        arn,
        home_region,
        is_multi_region: raw.is_multi_region.unwrap_or(false),
        is_logging: status.is_logging.unwrap_or(false),
        event_filter,
    })
}

fn normalize_selectors(
    selectors: RawEventSelectors,
) -> Result<Option<EventFilter>, NormalizationError> {
    match (selectors.classic.is_empty(), selectors.advanced.is_empty()) {
        (true, true) => Ok(None),
        (false, false) => Err(NormalizationError::Conflicting {
            kind: "trail",
            detail: "both classic and advanced event selectors present".to_string(),
        }),
        (false, true) => {
            // The provider returns classic selectors as a list; coverage is
            // the OR across it, and the first entry's scope stands in for
            // the informational read/write detail.
            let include_management_events = selectors
                .classic
                .iter()
                .any(|s| s.include_management_events.unwrap_or(false));
            let read_write_type =
                ReadWriteType::parse(selectors.classic[0].read_write_type.as_deref());
            Ok(Some(EventFilter::Classic {
                read_write_type,
                include_management_events,
            }))
        }
        (true, false) => {
            let field_selectors = selectors
                .advanced
                .into_iter()
                .flat_map(|s| s.field_selectors)
                .map(|fs| FieldSelector {
                    field: fs.field,
                    equals_values: fs.equals_values.into_iter().collect(),
                })
                .collect();
            Ok(Some(EventFilter::Advanced { field_selectors }))
        }
    }
}

/// Collect trails across all target regions
///
/// Shadow trails are listed on purpose (a multi-region trail must count for
/// the whole account no matter which region lists it); normalization keys
/// them by home region so the inventory holds each trail once.
pub async fn collect(
    ctx: &dyn AuditContext,
    cancel: &CancellationToken,
) -> ServiceInventory<Trail> {
    let clients = regional_clients(ctx.regions(), |r| ctx.cloudtrail_client(r));
    collect_regions(SERVICE, clients, cancel, collect_region).await
}

async fn collect_region(
    region: String,
    api: Arc<dyn CloudTrailApi>,
    cancel: CancellationToken,
) -> RegionSlice<Trail> {
    let list_api = api.clone();
    let (raw_trails, end) = drain_pages(&cancel, move |token| {
        let api = list_api.clone();
        async move { api.trails_page(token).await }
    })
    .await;

    let mut detail: Option<String> = match end {
        PaginationEnd::Exhausted => None,
        PaginationEnd::Cancelled => Some(CANCELLED_DETAIL.to_string()),
        PaginationEnd::Failed(err) => {
            warn!(region = %region, error = %err, "trail listing failed mid-pagination");
            Some(format!("trail listing failed: {err}"))
        }
    };

    let mut trails = Vec::with_capacity(raw_trails.len());
    for raw in raw_trails {
        if cancel.is_cancelled() {
            detail.get_or_insert_with(|| CANCELLED_DETAIL.to_string());
            break;
        }
        let Some(arn) = raw.arn.clone() else {
            let err = NormalizationError::MissingField {
                kind: "trail",
                field: "arn",
            };
            warn!(region = %region, error = %err, "dropping malformed trail payload");
            continue;
        };
        let status = match api.trail_status(&arn).await {
            Ok(status) => status,
            Err(err) => {
                warn!(region = %region, trail = %arn, error = %err, "failed to read trail status");
                detail.get_or_insert_with(|| format!("trail enrichment failed: {err}"));
                continue;
            }
        };
        let selectors = match api.event_selectors(&arn).await {
            Ok(selectors) => selectors,
            Err(err) => {
                warn!(region = %region, trail = %arn, error = %err, "failed to read event selectors");
                detail.get_or_insert_with(|| format!("trail enrichment failed: {err}"));
                continue;
            }
        };
        match normalize_trail(raw, status, selectors) {
            Ok(trail) => trails.push(trail),
            Err(err) => {
                warn!(region = %region, trail = %arn, error = %err, "dropping malformed trail payload");
            }
        }
    }

    match detail {
        None => RegionSlice::complete(region, trails),
        Some(detail) => RegionSlice::partial(region, trails, detail),
    }
}
