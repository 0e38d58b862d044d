//! ECS client backed by the AWS SDK

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ecs::types::TaskDefinitionField;
use aws_sdk_ecs::Client;

use crate::error::ProviderError;
use crate::provider::ecs::{RawContainer, RawKeyValue, RawTag, RawTaskDefinition};
use crate::provider::{EcsApi, Page};

pub struct AwsEcs {
    client: Client,
}

impl AwsEcs {
    pub fn new(sdk_config: &SdkConfig, region: &str) -> Self {
        let conf = aws_sdk_ecs::config::Builder::from(sdk_config)
            .region(aws_sdk_ecs::config::Region::new(region.to_string()))
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
impl EcsApi for AwsEcs {
    async fn task_definition_arns_page(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<String>, ProviderError> {
        let mut req = self.client.list_task_definitions();
        if let Some(token) = next_token {
            req = req.next_token(token);
        }
        let out = req
            .send()
            .await
            .map_err(|e| api_error("ListTaskDefinitions", e))?;

        Ok(Page {
            items: out.task_definition_arns().to_vec(),
            next_token: out.next_token().map(str::to_string),
        })
    }

    async fn task_definition(&self, arn: &str) -> Result<RawTaskDefinition, ProviderError> {
        let out = self
            .client
            .describe_task_definition()
            .task_definition(arn)
            .include(TaskDefinitionField::Tags)
            .send()
            .await
            .map_err(|e| api_error("DescribeTaskDefinition", e))?;

        // Tags ride on the response, not on the task definition payload.
        let tags = out
            .tags()
            .iter()
            .map(|t| RawTag {
                key: t.key().map(str::to_string),
                value: t.value().map(str::to_string),
            })
            .collect();

        let raw = match out.task_definition() {
            Some(td) => RawTaskDefinition {
                family: td.family().map(str::to_string),
                arn: td.task_definition_arn().map(str::to_string),
                containers: td
                    .container_definitions()
                    .iter()
                    .map(|c| RawContainer {
                        name: c.name().map(str::to_string),
                        environment: c
                            .environment()
                            .iter()
                            .map(|kv| RawKeyValue {
                                name: kv.name().map(str::to_string),
                                value: kv.value().map(str::to_string),
                            })
                            .collect(),
                    })
                    .collect(),
                tags,
            },
            None => RawTaskDefinition {
                tags,
                ..RawTaskDefinition::default()
            },
        };
        Ok(raw)
    }
}
