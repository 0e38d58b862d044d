//! ECS posture checks

use tracing::debug;

use crate::checks::engine::{Check, ScanInventory};
use crate::checks::patterns::match_environment_variable;
use crate::checks::results::{Finding, FindingSet, Severity};
use crate::error::CheckError;
use crate::provider::AuditContext;
use crate::services::ecs::SERVICE;

/// Verify task definitions carry no plaintext secrets in their environment.
///
/// This is a per-resource check: one finding per task definition, FAIL as
/// soon as any environment variable matches the secret tables. An account
/// with no task definitions produces no findings at all.
pub struct TaskDefinitionNoPlaintextSecrets;

pub const CHECK_ID: &str = "ecs_task_definition_no_plaintext_secrets";

impl Check for TaskDefinitionNoPlaintextSecrets {
    fn id(&self) -> &'static str {
        CHECK_ID
    }

    fn service(&self) -> &'static str {
        SERVICE
    }

    fn title(&self) -> &'static str {
        "Ensure task definitions keep secrets out of environment variables"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn execute(
        &self,
        inventory: &ScanInventory,
        _ctx: &dyn AuditContext,
    ) -> Result<FindingSet, CheckError> {
        let task_definitions = inventory.ecs()?;
        let mut findings = FindingSet::builder();

        for td in task_definitions.resources() {
            let hit = td
                .environment_variables
                .iter()
                .find_map(|v| match_environment_variable(&v.name, &v.value).map(|p| (v, p)));

            match hit {
                Some((variable, pattern)) => {
                    // Log the variable name and what matched, never the value.
                    debug!(
                        task_definition = %td.name,
                        variable = %variable.name,
                        pattern = pattern.name,
                        "environment variable matched secret pattern"
                    );
                    findings.push(Finding::fail(
                        &td.name,
                        &td.arn,
                        &td.region,
                        format!(
                            "Potential secret found in environment variables of ECS task definition {}.",
                            td.name
                        ),
                    ));
                }
                None => findings.push(Finding::pass(
                    &td.name,
                    &td.arn,
                    &td.region,
                    format!(
                        "No secrets found in environment variables of ECS task definition {}.",
                        td.name
                    ),
                )),
            }
        }

        Ok(findings.seal())
    }
}
