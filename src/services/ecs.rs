//! ECS inventory: canonical task definition records and their collection
//!
//! Task definitions are regional; the describing region is the record's
//! region. Environment variables are flattened across containers into one
//! ordered list so checks never walk container structure themselves.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::NormalizationError;
use crate::inventory::{
    collect_regions, drain_pages, regional_clients, PaginationEnd, RegionSlice, Resource,
    ServiceInventory, CANCELLED_DETAIL,
};
use crate::provider::ecs::RawTaskDefinition;
use crate::provider::{AuditContext, EcsApi};

/// Service identifier used in inventories, findings and config
pub const SERVICE: &str = "ecs";

/// A task definition revision, normalized
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDefinition {
    /// The family name (what findings call the task definition)
    pub name: String,
    /// Revision ARN; the inventory identity within a region
    pub arn: String,
    pub region: String,
    /// All containers' environment entries, container order then
    /// definition order
    pub environment_variables: Vec<EnvironmentVariable>,
    pub tags: Vec<ResourceTag>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceTag {
    pub key: String,
    pub value: String,
}

impl Resource for TaskDefinition {
    fn resource_id(&self) -> &str {
        &self.arn
    }

    fn region(&self) -> &str {
        &self.region
    }
}

/// Build a canonical [`TaskDefinition`] from a describe payload
///
/// Requires `family` and `arn`. Absent collections become empty ones; an
/// environment entry without a name is dropped, one without a value keeps
/// the name with an empty value.
pub fn normalize_task_definition(
    raw: RawTaskDefinition,
    region: &str,
) -> Result<TaskDefinition, NormalizationError> {
    let name = raw.family.ok_or(NormalizationError::MissingField {
        kind: "task definition",
        field: "family",
    })?;
    let arn = raw.arn.ok_or(NormalizationError::MissingField {
        kind: "task definition",
        field: "arn",
    })?;

    let environment_variables = raw
        .containers
        .into_iter()
        .flat_map(|c| c.environment)
        .filter_map(|kv| {
            kv.name.map(|name| EnvironmentVariable {
                name,
                value: kv.value.unwrap_or_default(),
            })
        })
        .collect();

    let tags = raw
        .tags
        .into_iter()
        .filter_map(|t| {
            t.key.map(|key| ResourceTag {
                key,
                value: t.value.unwrap_or_default(),
            })
        })
        .collect();

    Ok(TaskDefinition {
        name,
        arn,
        region: region.to_string(),
        environment_variables,
        tags,
    })
}

/// Collect task definitions across all target regions
pub async fn collect(
    ctx: &dyn AuditContext,
    cancel: &CancellationToken,
) -> ServiceInventory<TaskDefinition> {
    let clients = regional_clients(ctx.regions(), |r| ctx.ecs_client(r));
    collect_regions(SERVICE, clients, cancel, collect_region).await
}

async fn collect_region(
    region: String,
    api: Arc<dyn EcsApi>,
    cancel: CancellationToken,
) -> RegionSlice<TaskDefinition> {
    let list_api = api.clone();
    let (arns, end) = drain_pages(&cancel, move |token| {
        let api = list_api.clone();
        async move { api.task_definition_arns_page(token).await }
    })
    .await;

    let mut detail: Option<String> = match end {
        PaginationEnd::Exhausted => None,
        PaginationEnd::Cancelled => Some(CANCELLED_DETAIL.to_string()),
        PaginationEnd::Failed(err) => {
            warn!(region = %region, error = %err, "task definition listing failed mid-pagination");
            Some(format!("task definition listing failed: {err}"))
        }
    };

    let mut task_definitions = Vec::with_capacity(arns.len());
    for arn in arns {
        if cancel.is_cancelled() {
            detail.get_or_insert_with(|| CANCELLED_DETAIL.to_string());
            break;
        }
        let raw = match api.task_definition(&arn).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(region = %region, task_definition = %arn, error = %err, "failed to describe task definition");
                detail.get_or_insert_with(|| format!("task definition describe failed: {err}"));
                continue;
            }
        };
        match normalize_task_definition(raw, &region) {
            Ok(td) => task_definitions.push(td),
            Err(err) => {
                warn!(region = %region, task_definition = %arn, error = %err, "dropping malformed task definition payload");
            }
        }
    }

    match detail {
        None => RegionSlice::complete(region, task_definitions),
        Some(detail) => RegionSlice::partial(region, task_definitions, detail),
    }
}
