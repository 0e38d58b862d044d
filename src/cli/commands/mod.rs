//! CLI commands module

pub mod checks;
pub mod scan;

use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::CloudLensError;

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Regions to scan (defaults to every region enabled for the account)
    #[arg(short, long, value_delimiter = ',')]
    pub regions: Option<Vec<String>>,

    /// Named AWS profile to authenticate with
    #[arg(short, long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Region that account-level findings are attributed to
    #[arg(long, value_name = "REGION")]
    pub primary_region: Option<String>,

    /// Only run specific checks
    #[arg(long, value_delimiter = ',')]
    pub only: Option<Vec<String>>,

    /// Skip specific checks
    #[arg(long, value_delimiter = ',')]
    pub skip: Option<Vec<String>>,

    /// Output format (terminal, json); defaults to the configured format
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the checks command
#[derive(Args, Debug)]
pub struct ChecksArgs {
    /// Output format (terminal, json)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,
}

/// Output format for scan reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// Map a configuration file value onto a format, falling back to terminal.
    pub(crate) fn from_config(value: &str) -> Self {
        match value {
            "json" => Self::Json,
            _ => Self::Terminal,
        }
    }
}

/// Load configuration, honoring the global `--config` flag when present.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config, CloudLensError> {
    let config = match path {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load_or_default()?,
    };
    Ok(config)
}
