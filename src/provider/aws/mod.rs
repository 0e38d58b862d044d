//! Real AWS implementation of the provider contracts
//!
//! One session is loaded per scan; per-region clients are derived from it
//! on demand. Client construction itself never fails (the SDK resolves
//! credentials lazily), so authorization problems surface per call as
//! provider errors rather than at handout time.

mod cloudtrail;
mod ecs;

pub use cloudtrail::AwsCloudTrail;
pub use ecs::AwsEcs;

use std::sync::Arc;

use anyhow::{anyhow, Context as _};
use aws_config::{BehaviorVersion, SdkConfig};
use tracing::{debug, info};

use crate::error::AuthError;
use crate::provider::{AuditContext, CloudTrailApi, EcsApi};

/// Options for building an [`AwsAuditContext`]
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Named profile from the shared AWS config; default chain otherwise
    pub profile: Option<String>,
    /// Explicit region allow-list; discovered from the account when empty
    pub regions: Vec<String>,
    /// Region account-level findings attribute to; defaults to the session
    /// region, then `us-east-1`
    pub primary_region: Option<String>,
}

/// [`AuditContext`] backed by the AWS SDK
pub struct AwsAuditContext {
    sdk_config: SdkConfig,
    account_id: String,
    account_arn: String,
    primary_region: String,
    regions: Vec<String>,
}

impl AwsAuditContext {
    /// Load a session, resolve the account identity and the target regions
    pub async fn build(opts: SessionOptions) -> anyhow::Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = &opts.profile {
            debug!(profile = %profile, "using named AWS profile");
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        let sts = aws_sdk_sts::Client::new(&sdk_config);
        let identity = sts
            .get_caller_identity()
            .send()
            .await
            .context("failed to resolve caller identity; check AWS credentials")?;
        let account_id = identity
            .account()
            .ok_or_else(|| anyhow!("caller identity returned no account id"))?
            .to_string();
        let caller_arn = identity
            .arn()
            .ok_or_else(|| anyhow!("caller identity returned no ARN"))?;
        let account_arn = format!(
            "arn:{}:iam::{}:root",
            partition_from_arn(caller_arn),
            account_id
        );

        let primary_region = opts
            .primary_region
            .clone()
            .or_else(|| sdk_config.region().map(|r| r.to_string()))
            .unwrap_or_else(|| "us-east-1".to_string());

        let regions = if opts.regions.is_empty() {
            discover_regions(&sdk_config, &primary_region).await?
        } else {
            opts.regions.clone()
        };

        info!(
            account = %account_id,
            primary_region = %primary_region,
            regions = regions.len(),
            "AWS session ready"
        );

        Ok(Self {
            sdk_config,
            account_id,
            account_arn,
            primary_region,
            regions,
        })
    }
}

impl AuditContext for AwsAuditContext {
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
        Ok(Arc::new(AwsCloudTrail::new(&self.sdk_config, region)))
    }

    fn ecs_client(&self, region: &str) -> Result<Arc<dyn EcsApi>, AuthError> {
        Ok(Arc::new(AwsEcs::new(&self.sdk_config, region)))
    }
}

/// The partition segment of an ARN (`aws`, `aws-cn`, `aws-us-gov`)
fn partition_from_arn(arn: &str) -> &str {
    arn.split(':')
        .nth(1)
        .filter(|p| !p.is_empty())
        .unwrap_or("aws")
}

/// All regions enabled for the account, via EC2 DescribeRegions
async fn discover_regions(
    sdk_config: &SdkConfig,
    primary_region: &str,
) -> anyhow::Result<Vec<String>> {
    let conf = aws_sdk_ec2::config::Builder::from(sdk_config)
        .region(aws_sdk_ec2::config::Region::new(primary_region.to_string()))
        .build();
    let ec2 = aws_sdk_ec2::Client::from_conf(conf);
    let out = ec2
        .describe_regions()
        .send()
        .await
        .context("failed to list enabled regions")?;

    let mut regions: Vec<String> = out
        .regions()
        .iter()
        .filter_map(|r| r.region_name().map(str::to_string))
        .collect();
    regions.sort();
    debug!(regions = regions.len(), "discovered enabled regions");
    Ok(regions)
}
