//! ECS API contract and raw payload shapes

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::provider::Page;

/// Region-scoped ECS API surface
#[async_trait]
pub trait EcsApi: Send + Sync {
    /// One page of task definition ARNs (active revisions)
    async fn task_definition_arns_page(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<String>, ProviderError>;

    /// Full description of one task definition, tags included
    async fn task_definition(&self, arn: &str) -> Result<RawTaskDefinition, ProviderError>;
}

/// A task definition as returned by the describe call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTaskDefinition {
    pub family: Option<String>,
    pub arn: Option<String>,
    pub containers: Vec<RawContainer>,
    pub tags: Vec<RawTag>,
}

/// One container definition inside a task definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawContainer {
    pub name: Option<String>,
    /// Environment entries in definition order
    pub environment: Vec<RawKeyValue>,
}

/// An environment entry; the provider allows either side to be absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawKeyValue {
    pub name: Option<String>,
    pub value: Option<String>,
}

/// A resource tag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTag {
    pub key: Option<String>,
    pub value: Option<String>,
}
