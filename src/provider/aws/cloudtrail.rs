//! CloudTrail client backed by the AWS SDK

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudtrail::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudtrail::Client;

use crate::error::ProviderError;
use crate::provider::cloudtrail::{
    RawAdvancedSelector, RawClassicSelector, RawEventSelectors, RawFieldSelector, RawTrail,
    RawTrailStatus,
};
use crate::provider::{CloudTrailApi, Page};

pub struct AwsCloudTrail {
    client: Client,
}

impl AwsCloudTrail {
    pub fn new(sdk_config: &SdkConfig, region: &str) -> Self {
        let conf = aws_sdk_cloudtrail::config::Builder::from(sdk_config)
            .region(aws_sdk_cloudtrail::config::Region::new(region.to_string()))
            .build();
        Self {
            client: Client::from_conf(conf),
        }
    }
}

fn api_error<E>(operation: &'static str, err: SdkError<E>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let code = err.code().unwrap_or("Unknown").to_string();
    let message = match err.message() {
        Some(m) => format!("{operation}: {m}"),
        None => format!("{operation}: {}", DisplayErrorContext(&err)),
    };
    ProviderError::new(code, message)
}

#[async_trait]
impl CloudTrailApi for AwsCloudTrail {
    async fn trails_page(
        &self,
        _next_token: Option<String>,
    ) -> Result<Page<RawTrail>, ProviderError> {
        // DescribeTrails does not paginate; one call is the whole listing.
        // Shadow trails are requested so a multi-region trail is visible
        // from every region, whichever regions the scan covers.
        let out = self
            .client
            .describe_trails()
            .include_shadow_trails(true)
            .send()
            .await
            .map_err(|e| api_error("DescribeTrails", e))?;

        let items = out
            .trail_list()
            .iter()
            .map(|t| RawTrail {
                name: t.name().map(str::to_string),
                arn: t.trail_arn().map(str::to_string),
                home_region: t.home_region().map(str::to_string),
                is_multi_region: t.is_multi_region_trail(),
            })
            .collect();
        Ok(Page::last(items))
    }

    async fn trail_status(&self, trail_arn: &str) -> Result<RawTrailStatus, ProviderError> {
        let out = self
            .client
            .get_trail_status()
            .name(trail_arn)
            .send()
            .await
            .map_err(|e| api_error("GetTrailStatus", e))?;

        Ok(RawTrailStatus {
            is_logging: out.is_logging(),
        })
    }

    async fn event_selectors(&self, trail_arn: &str) -> Result<RawEventSelectors, ProviderError> {
        let out = self
            .client
            .get_event_selectors()
            .trail_name(trail_arn)
            .send()
            .await
            .map_err(|e| api_error("GetEventSelectors", e))?;

        let classic = out
            .event_selectors()
            .iter()
            .map(|s| RawClassicSelector {
                read_write_type: s.read_write_type().map(|t| t.as_str().to_string()),
                include_management_events: s.include_management_events(),
            })
            .collect();

        let advanced = out
            .advanced_event_selectors()
            .iter()
            .map(|s| RawAdvancedSelector {
                name: s.name().map(str::to_string),
                field_selectors: s
                    .field_selectors()
                    .iter()
                    .map(|fs| RawFieldSelector {
                        field: fs.field().to_string(),
                        equals_values: fs.equals().to_vec(),
                    })
                    .collect(),
            })
            .collect();

        Ok(RawEventSelectors { classic, advanced })
    }
}
