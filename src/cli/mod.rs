//! # CLI Module
//!
//! This module defines the command-line interface for CloudLens using `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | Scan an AWS account and report check findings |
//! | `checks` | List the built-in checks |
//!
//! ## Submodules
//!
//! - [`commands`] - Command implementations
//! - [`output`] - Report output formatters (JSON, Terminal)
//!
//! ## Global Options
//!
//! All commands support these global options:
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to configuration file
//!
//! ## Examples
//!
//! ```bash
//! # Scan every enabled region with the default profile
//! cloudlens scan
//!
//! # Scan two regions with a named profile, write a JSON report
//! cloudlens scan --profile audit --regions eu-west-1,us-east-1 --format json -o report.json
//!
//! # Run a single check
//! cloudlens scan --only cloudtrail_multi_region_enabled_logging_management_events
//!
//! # List the available checks
//! cloudlens checks
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{ChecksArgs, ScanArgs};

/// CloudLens - Audit AWS accounts for security and compliance posture
#[derive(Parser, Debug)]
#[command(name = "cloudlens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan an AWS account and report check findings
    Scan(ScanArgs),

    /// List the built-in checks
    Checks(ChecksArgs),
}
