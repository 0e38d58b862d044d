//! Shared in-memory provider doubles for integration tests
//!
//! The mocks implement the same traits the AWS adapters do, so the whole
//! pipeline (collection, normalization, checks, reporting) runs unmodified
//! against scripted responses.

// Each test binary compiles this module separately and uses its own subset.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use cloudlens::error::{AuthError, ProviderError};
use cloudlens::provider::cloudtrail::{
    CloudTrailApi, RawEventSelectors, RawTrail, RawTrailStatus,
};
use cloudlens::provider::ecs::{EcsApi, RawTaskDefinition};
use cloudlens::provider::{AuditContext, Page};

pub const ACCOUNT_ID: &str = "123456789012";
pub const ACCOUNT_ARN: &str = "arn:aws:iam::123456789012:root";

/// One scripted page of a listing
enum PageScript<T> {
    Items(Vec<T>),
    Fail,
}

fn page_index(next_token: Option<String>) -> usize {
    match next_token {
        None => 0,
        Some(token) => token.parse().expect("mock page tokens are indices"),
    }
}

fn serve_page<T: Clone>(
    pages: &[PageScript<T>],
    next_token: Option<String>,
) -> Result<Page<T>, ProviderError> {
    let index = page_index(next_token);
    match pages.get(index) {
        None => Ok(Page::last(Vec::new())),
        Some(PageScript::Fail) => Err(ProviderError::new(
            "ThrottlingException",
            "scripted listing failure",
        )),
        Some(PageScript::Items(items)) => {
            let next = if index + 1 < pages.len() {
                Some((index + 1).to_string())
            } else {
                None
            };
            Ok(Page {
                items: items.clone(),
                next_token: next,
            })
        }
    }
}

/// Scripted CloudTrail API for one region
#[derive(Default)]
pub struct MockCloudTrail {
    pages: Vec<PageScript<RawTrail>>,
    statuses: HashMap<String, RawTrailStatus>,
    selectors: HashMap<String, RawEventSelectors>,
    failing_statuses: HashSet<String>,
    failing_selectors: HashSet<String>,
    cancel_during_page: Option<(usize, CancellationToken)>,
}

impl MockCloudTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page to the trail listing
    pub fn page(mut self, trails: Vec<RawTrail>) -> Self {
        self.pages.push(PageScript::Items(trails));
        self
    }

    /// Append a page whose fetch fails
    pub fn failing_page(mut self) -> Self {
        self.pages.push(PageScript::Fail);
        self
    }

    /// Script the logging status for a trail ARN
    pub fn status(mut self, arn: &str, is_logging: bool) -> Self {
        self.statuses.insert(
            arn.to_string(),
            RawTrailStatus {
                is_logging: Some(is_logging),
            },
        );
        self
    }

    /// Script the event selectors for a trail ARN
    pub fn selectors(mut self, arn: &str, selectors: RawEventSelectors) -> Self {
        self.selectors.insert(arn.to_string(), selectors);
        self
    }

    /// Make the status call fail for a trail ARN
    pub fn failing_status(mut self, arn: &str) -> Self {
        self.failing_statuses.insert(arn.to_string());
        self
    }

    /// Make the selector call fail for a trail ARN
    pub fn failing_selectors(mut self, arn: &str) -> Self {
        self.failing_selectors.insert(arn.to_string());
        self
    }

    /// Trigger the given token while serving the page at `index`, simulating
    /// an interrupt that lands mid-listing
    pub fn cancel_during_page(mut self, index: usize, token: CancellationToken) -> Self {
        self.cancel_during_page = Some((index, token));
        self
    }
}

#[async_trait]
impl CloudTrailApi for MockCloudTrail {
    async fn trails_page(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<RawTrail>, ProviderError> {
        if let Some((at, token)) = &self.cancel_during_page {
            if *at == page_index(next_token.clone()) {
                token.cancel();
            }
        }
        serve_page(&self.pages, next_token)
    }

    async fn trail_status(&self, trail_arn: &str) -> Result<RawTrailStatus, ProviderError> {
        if self.failing_statuses.contains(trail_arn) {
            return Err(ProviderError::new(
                "AccessDeniedException",
                "scripted status failure",
            ));
        }
        Ok(self.statuses.get(trail_arn).cloned().unwrap_or_default())
    }

    async fn event_selectors(&self, trail_arn: &str) -> Result<RawEventSelectors, ProviderError> {
        if self.failing_selectors.contains(trail_arn) {
            return Err(ProviderError::new(
                "AccessDeniedException",
                "scripted selector failure",
            ));
        }
        Ok(self.selectors.get(trail_arn).cloned().unwrap_or_default())
    }
}

/// Scripted ECS API for one region
#[derive(Default)]
pub struct MockEcs {
    pages: Vec<PageScript<String>>,
    task_definitions: HashMap<String, RawTaskDefinition>,
    failing_describes: HashSet<String>,
}

impl MockEcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page of task definition ARNs
    pub fn page<S: Into<String>>(mut self, arns: Vec<S>) -> Self {
        self.pages
            .push(PageScript::Items(arns.into_iter().map(Into::into).collect()));
        self
    }

    /// Append a page whose fetch fails
    pub fn failing_page(mut self) -> Self {
        self.pages.push(PageScript::Fail);
        self
    }

    /// Script the describe response for a task definition ARN
    pub fn task_definition(mut self, arn: &str, definition: RawTaskDefinition) -> Self {
        self.task_definitions.insert(arn.to_string(), definition);
        self
    }

    /// Make the describe call fail for a task definition ARN
    pub fn failing_describe(mut self, arn: &str) -> Self {
        self.failing_describes.insert(arn.to_string());
        self
    }
}

#[async_trait]
impl EcsApi for MockEcs {
    async fn task_definition_arns_page(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<String>, ProviderError> {
        serve_page(&self.pages, next_token)
    }

    async fn task_definition(&self, arn: &str) -> Result<RawTaskDefinition, ProviderError> {
        if self.failing_describes.contains(arn) {
            return Err(ProviderError::new(
                "ClientException",
                "scripted describe failure",
            ));
        }
        self.task_definitions
            .get(arn)
            .cloned()
            .ok_or_else(|| ProviderError::new("ClientException", "unknown task definition"))
    }
}

/// Scripted audit context serving per-region mocks
///
/// Regions without a scripted mock get an empty one; regions added through
/// [`deny_region`](MockContext::deny_region) fail client handout the way an
/// expired or unauthorized credential would.
pub struct MockContext {
    account_id: String,
    account_arn: String,
    primary_region: String,
    regions: Vec<String>,
    cloudtrail: HashMap<String, Arc<MockCloudTrail>>,
    ecs: HashMap<String, Arc<MockEcs>>,
    denied: HashSet<String>,
}

impl MockContext {
    pub fn new(regions: &[&str]) -> Self {
        Self {
            account_id: ACCOUNT_ID.to_string(),
            account_arn: ACCOUNT_ARN.to_string(),
            primary_region: regions.first().unwrap_or(&"us-east-1").to_string(),
            regions: regions.iter().map(|r| r.to_string()).collect(),
            cloudtrail: HashMap::new(),
            ecs: HashMap::new(),
            denied: HashSet::new(),
        }
    }

    pub fn with_primary(mut self, region: &str) -> Self {
        self.primary_region = region.to_string();
        self
    }

    pub fn with_cloudtrail(mut self, region: &str, mock: MockCloudTrail) -> Self {
        self.cloudtrail.insert(region.to_string(), Arc::new(mock));
        self
    }

    pub fn with_ecs(mut self, region: &str, mock: MockEcs) -> Self {
        self.ecs.insert(region.to_string(), Arc::new(mock));
        self
    }

    /// Make client handout fail for a region, for both services
    pub fn deny_region(mut self, region: &str) -> Self {
        self.denied.insert(region.to_string());
        self
    }
}

impl AuditContext for MockContext {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn account_arn(&self) -> &str {
        &self.account_arn
    }

    fn primary_region(&self) -> &str {
        &self.primary_region
    }

    fn regions(&self) -> &[String] {
        &self.regions
    }

    fn cloudtrail_client(&self, region: &str) -> Result<Arc<dyn CloudTrailApi>, AuthError> {
        if self.denied.contains(region) {
            return Err(AuthError::new(region, "scripted credential failure"));
        }
        Ok(self
            .cloudtrail
            .get(region)
            .cloned()
            .map(|mock| mock as Arc<dyn CloudTrailApi>)
            .unwrap_or_else(|| Arc::new(MockCloudTrail::new())))
    }

    fn ecs_client(&self, region: &str) -> Result<Arc<dyn EcsApi>, AuthError> {
        if self.denied.contains(region) {
            return Err(AuthError::new(region, "scripted credential failure"));
        }
        Ok(self
            .ecs
            .get(region)
            .cloned()
            .map(|mock| mock as Arc<dyn EcsApi>)
            .unwrap_or_else(|| Arc::new(MockEcs::new())))
    }
}
