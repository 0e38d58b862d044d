//! CloudLens Library
//!
//! This crate provides the core functionality for scanning AWS accounts
//! and evaluating their security and compliance posture.

pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;
pub mod provider;
pub mod services;
pub mod utils;

pub use error::CloudLensError;

/// Exit codes for the CLI
pub mod exit_codes {
    /// Success - every evaluated check passed
    pub const SUCCESS: i32 = 0;
    /// At least one check produced a FAIL finding
    pub const FAILED_FINDINGS: i32 = 1;
    /// The scan finished but some regions or checks were degraded
    pub const INCOMPLETE_SCAN: i32 = 2;
    /// Configuration or runtime error
    pub const ERROR: i32 = 3;
}
