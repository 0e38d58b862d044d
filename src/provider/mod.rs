//! Provider abstraction layer
//!
//! Everything the scan needs from the outside world enters through the
//! traits in this module: [`AuditContext`] describes the account under audit
//! and hands out per-region service clients, and the per-service API traits
//! ([`CloudTrailApi`], [`EcsApi`]) wrap the raw provider calls.
//!
//! Collection and checks depend only on these traits. The real AWS
//! implementation lives in [`aws`]; tests substitute in-memory doubles by
//! implementing the same traits, so nothing in the pipeline is patched or
//! stubbed behind the caller's back.

pub mod aws;
pub mod cloudtrail;
pub mod ecs;

use std::sync::Arc;

use crate::error::AuthError;

pub use cloudtrail::CloudTrailApi;
pub use ecs::EcsApi;

/// One page of a cursor-paginated listing
///
/// `next_token` of `None` means the listing is exhausted. Tokens are opaque
/// and only valid for the listing that produced them.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items in this page, in provider order
    pub items: Vec<T>,
    /// Cursor for the next page, if any
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// A terminal page carrying the given items
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }
}

/// The account under audit and its provider access
///
/// An `AuditContext` is built once per scan and threaded through collection
/// and checks. Client handout is per region: a context may succeed in one
/// region and fail authentication in another, and callers must treat each
/// region independently.
pub trait AuditContext: Send + Sync {
    /// The twelve-digit account identifier
    fn account_id(&self) -> &str;

    /// The account root ARN (e.g. `arn:aws:iam::123456789012:root`)
    fn account_arn(&self) -> &str;

    /// The region account-level findings are attributed to
    fn primary_region(&self) -> &str;

    /// All regions this scan targets
    fn regions(&self) -> &[String];

    /// A CloudTrail client scoped to one region
    fn cloudtrail_client(&self, region: &str) -> Result<Arc<dyn CloudTrailApi>, AuthError>;

    /// An ECS client scoped to one region
    fn ecs_client(&self, region: &str) -> Result<Arc<dyn EcsApi>, AuthError>;
}
