//! Error types for CloudLens
//!
//! This module defines custom error types using `thiserror` for better error handling
//! and more descriptive error messages throughout the application.
//!
//! The taxonomy separates errors by blast radius: [`AuthError`],
//! [`ProviderError`] and [`NormalizationError`] are contained (a region, call
//! or item degrades without failing the scan), [`CheckError`] fails a single
//! check, and only [`ScanError`] aborts the whole run.

use thiserror::Error;

/// Main error type for CloudLens
#[derive(Error, Debug)]
pub enum CloudLensError {
    /// Scan-related errors (the only class that aborts a run)
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Configuration file errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Report rendering/writing errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// AWS session bootstrap errors (credential chain, identity discovery)
    #[error("Session error: {0:#}")]
    Session(#[source] anyhow::Error),
}

impl From<serde_json::Error> for CloudLensError {
    fn from(err: serde_json::Error) -> Self {
        CloudLensError::Report(ReportError::Serialize(err))
    }
}

/// Errors that abort an entire scan
///
/// Everything else degrades: unreachable regions become skipped regions,
/// failed API calls become partial inventories, malformed items are dropped.
/// A scan only aborts when there is nothing left to evaluate.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The resolved region set was empty
    #[error("no target regions resolved; pass --regions or check account region access")]
    NoRegions,

    /// Every target region failed authentication
    #[error("no reachable regions: authentication failed in all {attempted} target regions")]
    NoReachableRegions {
        /// Number of regions that were attempted
        attempted: usize,
    },
}

/// Authentication or authorization failure scoped to one region
///
/// Collection skips the region and records the failure; other regions
/// proceed unaffected.
#[derive(Error, Debug, Clone)]
#[error("authentication failed in region '{region}': {message}")]
pub struct AuthError {
    /// Region the credential/authorization failure occurred in
    pub region: String,
    /// Human-readable description of the failure
    pub message: String,
}

impl AuthError {
    pub fn new(region: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            message: message.into(),
        }
    }
}

/// A provider API call failed
///
/// Carries the provider's error code (e.g. `AccessDeniedException`,
/// `ThrottlingException`) when one was returned. Collection treats these as
/// partial results, never as scan aborts.
#[derive(Error, Debug, Clone)]
#[error("{code}: {message}")]
pub struct ProviderError {
    /// Provider error code, or `"Unknown"` when none was returned
    pub code: String,
    /// Human-readable description of the failure
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A raw provider payload could not be converted to a canonical record
///
/// The offending item is skipped and logged; the rest of the inventory is
/// unaffected.
#[derive(Error, Debug, Clone)]
pub enum NormalizationError {
    /// A field the canonical record requires was absent from the payload
    #[error("{kind} payload missing required field '{field}'")]
    MissingField {
        /// Resource kind being normalized (e.g. "trail")
        kind: &'static str,
        /// Name of the absent field
        field: &'static str,
    },

    /// The payload contained mutually exclusive data
    #[error("conflicting {kind} payload: {detail}")]
    Conflicting {
        /// Resource kind being normalized
        kind: &'static str,
        /// What conflicted
        detail: String,
    },
}

/// A check could not run over the collected inventory
///
/// These indicate a wiring defect (a check asking for a service the engine
/// never collected), not an account problem. The engine logs the check as
/// errored and continues with the rest.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The check requested a service inventory the scan did not collect
    #[error("no '{service}' inventory was collected for this scan")]
    MissingInventory {
        /// Service identifier the check asked for
        service: &'static str,
    },
}

/// Errors loading or parsing the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as TOML
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors producing or writing a report
#[derive(Error, Debug)]
pub enum ReportError {
    /// Failed to serialize scan results
    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to write the report to disk
    #[error("Failed to write report '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}
