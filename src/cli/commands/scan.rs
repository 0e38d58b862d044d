//! Scan command - Scan an AWS account and evaluate checks

use colored::Colorize;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::{load_config, OutputFormat, ScanArgs};
use crate::checks::CheckEngine;
use crate::cli::output::{JsonOutput, ReportRenderer, TerminalOutput};
use crate::error::{CloudLensError, ReportError};
use crate::exit_codes;
use crate::provider::aws::{AwsAuditContext, SessionOptions};

/// Execute the scan command
pub async fn execute(args: ScanArgs, config_path: Option<&Path>) -> Result<i32, CloudLensError> {
    let config = load_config(config_path)?;

    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::from_config(&config.output.format));

    let session = SessionOptions {
        profile: args.profile.or_else(|| config.profile.clone()),
        regions: args.regions.unwrap_or_else(|| config.regions.clone()),
        primary_region: args.primary_region,
    };

    // Install the Ctrl-C handler before any network call so an interrupt
    // during collection still yields a partial report.
    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let ctx = AwsAuditContext::build(session)
        .await
        .map_err(CloudLensError::Session)?;

    let mut engine = CheckEngine::new(config);
    if let Some(only) = args.only {
        engine.set_only_checks(only);
    }
    if let Some(skip) = args.skip {
        engine.set_skip_checks(skip);
    }

    let results = engine.run(&ctx, &cancel).await?;

    let renderer: Box<dyn ReportRenderer> = match format {
        OutputFormat::Terminal => Box::new(TerminalOutput::new()),
        OutputFormat::Json => Box::new(JsonOutput::new()),
    };
    let report = renderer.render_report(&results)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &report).map_err(|e| {
                CloudLensError::Report(ReportError::FileWrite {
                    path: path.display().to_string(),
                    source: e,
                })
            })?;
            println!(
                "{} Report written to: {}",
                "Success:".green().bold(),
                path.display().to_string().cyan()
            );
        }
        None => println!("{}", report),
    }

    let exit_code = if results.has_failures() {
        exit_codes::FAILED_FINDINGS
    } else if !results.is_complete() {
        exit_codes::INCOMPLETE_SCAN
    } else {
        exit_codes::SUCCESS
    };

    Ok(exit_code)
}

fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl-C handler");
            return;
        }
        eprintln!("\nInterrupted, finishing with partial results...");
        cancel.cancel();
    });
}
