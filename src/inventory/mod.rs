//! Generic multi-region inventory collection
//!
//! Every service collector is built from the same three pieces:
//!
//! 1. [`regional_clients`] asks the audit context for one client per target
//!    region, partitioning regions into reachable and skipped instead of
//!    failing the scan on the first bad region.
//! 2. [`drain_pages`] walks a cursor-paginated listing to exhaustion,
//!    checking for cancellation between fetches and degrading to a partial
//!    result on a mid-pagination failure.
//! 3. [`collect_regions`] runs one collection future per reachable region
//!    concurrently and merges the resulting [`RegionSlice`]s into a single
//!    [`ServiceInventory`] at one point, in deterministic region order.
//!
//! The inventory keys resources by `(region, resource_id)`, so re-inserting
//! an identity replaces the previous record. Multi-region trail shadow
//! copies collapse through exactly this property.

use std::collections::BTreeMap;
use std::future::Future;

use futures::future::join_all;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::{AuthError, ProviderError};
use crate::provider::Page;

/// Detail string recorded when cancellation interrupts a region
pub const CANCELLED_DETAIL: &str = "collection cancelled before completion";

/// A canonical resource record that can live in a [`ServiceInventory`]
pub trait Resource {
    /// Provider-scoped identifier, unique within a region
    fn resource_id(&self) -> &str;

    /// Region this resource belongs to (for trails, the home region)
    fn region(&self) -> &str;
}

/// How completely a region was collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStatus {
    /// Every listing page and enrichment call succeeded
    Complete,
    /// Some resources were gathered, then collection was cut short
    Partial,
    /// The region was never read (authentication failed)
    Skipped,
}

/// Collection outcome for one region
#[derive(Debug, Clone, Serialize)]
pub struct RegionReport {
    pub region: String,
    pub status: CollectionStatus,
    /// What cut collection short, when it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RegionReport {
    pub fn complete(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            status: CollectionStatus::Complete,
            detail: None,
        }
    }

    pub fn partial(region: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            status: CollectionStatus::Partial,
            detail: Some(detail.into()),
        }
    }

    pub fn skipped(region: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            status: CollectionStatus::Skipped,
            detail: Some(detail.into()),
        }
    }
}

/// Everything one region contributed to a service inventory
#[derive(Debug)]
pub struct RegionSlice<T> {
    pub region: String,
    pub resources: Vec<T>,
    pub status: CollectionStatus,
    pub detail: Option<String>,
}

impl<T> RegionSlice<T> {
    pub fn complete(region: impl Into<String>, resources: Vec<T>) -> Self {
        Self {
            region: region.into(),
            resources,
            status: CollectionStatus::Complete,
            detail: None,
        }
    }

    pub fn partial(
        region: impl Into<String>,
        resources: Vec<T>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            resources,
            status: CollectionStatus::Partial,
            detail: Some(detail.into()),
        }
    }

    fn report(&self) -> RegionReport {
        RegionReport {
            region: self.region.clone(),
            status: self.status,
            detail: self.detail.clone(),
        }
    }
}

/// The merged, immutable-after-collection view of one service
///
/// Iteration order is the `(region, resource_id)` key order, so two scans of
/// the same account produce identically ordered inventories regardless of
/// which region's future finished first.
#[derive(Debug)]
pub struct ServiceInventory<T> {
    service: &'static str,
    resources: BTreeMap<(String, String), T>,
    region_reports: Vec<RegionReport>,
}

impl<T: Resource> ServiceInventory<T> {
    pub fn new(service: &'static str) -> Self {
        Self {
            service,
            resources: BTreeMap::new(),
            region_reports: Vec::new(),
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    /// Insert a resource under its identity key, replacing any previous
    /// record with the same `(region, resource_id)`
    pub fn insert(&mut self, resource: T) {
        let key = (
            resource.region().to_string(),
            resource.resource_id().to_string(),
        );
        self.resources.insert(key, resource);
    }

    pub fn record_region(&mut self, report: RegionReport) {
        self.region_reports.push(report);
    }

    /// Resources in deterministic `(region, resource_id)` order
    pub fn resources(&self) -> impl Iterator<Item = &T> {
        self.resources.values()
    }

    pub fn get(&self, region: &str, resource_id: &str) -> Option<&T> {
        self.resources
            .get(&(region.to_string(), resource_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn region_reports(&self) -> &[RegionReport] {
        &self.region_reports
    }

    /// True when every target region was collected in full
    pub fn is_complete(&self) -> bool {
        self.region_reports
            .iter()
            .all(|r| r.status == CollectionStatus::Complete)
    }

    /// True when not a single region could be read
    pub fn all_regions_skipped(&self) -> bool {
        !self.region_reports.is_empty()
            && self
                .region_reports
                .iter()
                .all(|r| r.status == CollectionStatus::Skipped)
    }

    fn merge_slice(&mut self, slice: RegionSlice<T>) {
        self.record_region(slice.report());
        for resource in slice.resources {
            self.insert(resource);
        }
    }

    fn sort_reports(&mut self) {
        self.region_reports.sort_by(|a, b| a.region.cmp(&b.region));
    }
}

/// Per-region clients, with unreachable regions carried alongside
pub struct RegionalClients<C> {
    pub ready: Vec<(String, C)>,
    pub failed: Vec<(String, AuthError)>,
}

/// Ask the context for one client per region
///
/// A region whose client cannot be built is reported, never dropped: the
/// caller turns `failed` entries into skipped-region reports.
pub fn regional_clients<C>(
    regions: &[String],
    mut factory: impl FnMut(&str) -> Result<C, AuthError>,
) -> RegionalClients<C> {
    let mut ready = Vec::new();
    let mut failed = Vec::new();
    for region in regions {
        match factory(region) {
            Ok(client) => ready.push((region.clone(), client)),
            Err(err) => failed.push((region.clone(), err)),
        }
    }
    RegionalClients { ready, failed }
}

/// How a pagination loop ended
#[derive(Debug)]
pub enum PaginationEnd {
    /// The listing returned a page without a continuation token
    Exhausted,
    /// Cancellation was observed between fetches
    Cancelled,
    /// A fetch failed; items gathered before it are kept
    Failed(ProviderError),
}

/// Walk a cursor-paginated listing to exhaustion
///
/// The cursor is finite and never restarted: each page is fetched once, in
/// order, and a failed fetch ends the loop with whatever was gathered so
/// far. Cancellation is observed between fetches, so an in-flight request
/// is never abandoned halfway through.
pub async fn drain_pages<T, F, Fut>(
    cancel: &CancellationToken,
    mut fetch: F,
) -> (Vec<T>, PaginationEnd)
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ProviderError>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    loop {
        if cancel.is_cancelled() {
            return (items, PaginationEnd::Cancelled);
        }
        match fetch(token.take()).await {
            Ok(page) => {
                items.extend(page.items);
                match page.next_token {
                    Some(next) => token = Some(next),
                    None => return (items, PaginationEnd::Exhausted),
                }
            }
            Err(err) => return (items, PaginationEnd::Failed(err)),
        }
    }
}

/// Collect one service across all target regions
///
/// Reachable regions run concurrently; each produces a [`RegionSlice`] and
/// all slices are merged here, sorted by region first so the merge order
/// (and therefore replace-order for duplicate identities) is deterministic.
pub async fn collect_regions<T, C, F, Fut>(
    service: &'static str,
    clients: RegionalClients<C>,
    cancel: &CancellationToken,
    per_region: F,
) -> ServiceInventory<T>
where
    T: Resource,
    F: Fn(String, C, CancellationToken) -> Fut,
    Fut: Future<Output = RegionSlice<T>>,
{
    let mut inventory = ServiceInventory::new(service);

    for (region, err) in clients.failed {
        warn!(service, region = %region, error = %err, "skipping unreachable region");
        inventory.record_region(RegionReport::skipped(region, err.to_string()));
    }

    let collections: Vec<_> = clients
        .ready
        .into_iter()
        .map(|(region, client)| per_region(region, client, cancel.clone()))
        .collect();
    let mut slices = join_all(collections).await;
    slices.sort_by(|a, b| a.region.cmp(&b.region));

    for slice in slices {
        if slice.status == CollectionStatus::Partial {
            warn!(
                service,
                region = %slice.region,
                detail = slice.detail.as_deref().unwrap_or(""),
                "region collected partially"
            );
        }
        inventory.merge_slice(slice);
    }
    inventory.sort_reports();
    inventory
}
