//! Checks command - List the built-in checks

use colored::Colorize;
use serde::Serialize;

use super::{ChecksArgs, OutputFormat};
use crate::checks::catalog;
use crate::checks::Severity;
use crate::error::CloudLensError;
use crate::exit_codes;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckEntry {
    check_id: &'static str,
    service: &'static str,
    severity: Severity,
    title: &'static str,
}

/// Execute the checks command
pub async fn execute(args: ChecksArgs) -> Result<i32, CloudLensError> {
    let checks = catalog::all();

    match args.format {
        OutputFormat::Json => {
            let entries: Vec<CheckEntry> = checks
                .iter()
                .map(|check| CheckEntry {
                    check_id: check.id(),
                    service: check.service(),
                    severity: check.severity(),
                    title: check.title(),
                })
                .collect();
            let rendered = serde_json::to_string_pretty(&entries)?;
            println!("{}", rendered);
        }
        OutputFormat::Terminal => {
            println!("\n{} ({})\n", "Available checks".bold(), checks.len());
            for check in &checks {
                println!(
                    "  {} [{}] {}",
                    check.id().cyan(),
                    check.severity().to_string().yellow(),
                    check.title()
                );
                println!("    {} {}", "service:".dimmed(), check.service());
            }
            println!();
        }
    }

    Ok(exit_codes::SUCCESS)
}
