//! CloudTrail API contract and raw payload shapes
//!
//! The raw structs mirror what the provider actually returns, optionality
//! included. Turning them into canonical records (and rejecting malformed
//! ones) is the job of `services::cloudtrail`, not this layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::provider::Page;

/// Region-scoped CloudTrail API surface
#[async_trait]
pub trait CloudTrailApi: Send + Sync {
    /// One page of the trail listing, shadow trails included
    ///
    /// Multi-region trails appear once per region they cover; the caller is
    /// responsible for collapsing shadow copies.
    async fn trails_page(&self, next_token: Option<String>) -> Result<Page<RawTrail>, ProviderError>;

    /// Logging status for one trail, addressed by ARN
    async fn trail_status(&self, trail_arn: &str) -> Result<RawTrailStatus, ProviderError>;

    /// Event selectors for one trail, addressed by ARN
    ///
    /// A trail carries classic selectors or advanced selectors, never both;
    /// the raw shape still holds both lists so normalization can detect a
    /// provider that breaks that contract.
    async fn event_selectors(&self, trail_arn: &str) -> Result<RawEventSelectors, ProviderError>;
}

/// A trail as returned by the listing call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrail {
    pub name: Option<String>,
    pub arn: Option<String>,
    /// Region the trail was created in; shadow copies repeat it unchanged
    pub home_region: Option<String>,
    pub is_multi_region: Option<bool>,
}

/// Trail logging status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrailStatus {
    pub is_logging: Option<bool>,
}

/// Both event selector generations, as returned side by side
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEventSelectors {
    pub classic: Vec<RawClassicSelector>,
    pub advanced: Vec<RawAdvancedSelector>,
}

/// Classic (basic) event selector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawClassicSelector {
    /// `"All"`, `"ReadOnly"` or `"WriteOnly"`
    pub read_write_type: Option<String>,
    pub include_management_events: Option<bool>,
}

/// Advanced event selector: a named conjunction of field conditions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAdvancedSelector {
    pub name: Option<String>,
    pub field_selectors: Vec<RawFieldSelector>,
}

/// One field condition inside an advanced selector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFieldSelector {
    /// Field the condition applies to (e.g. `eventCategory`)
    pub field: String,
    /// Values the field must equal (other operators are irrelevant here)
    pub equals_values: Vec<String>,
}
