//! Configuration module
//!
//! CloudLens reads `.cloudlens.toml` from the working directory when
//! present; every setting has a sensible default and command-line flags win
//! over the file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{CloudLensError, ConfigError};

const CONFIG_FILENAME: &str = ".cloudlens.toml";

/// Per-check configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Whether the check is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default report format (terminal, json)
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
        }
    }
}

fn default_format() -> String {
    "terminal".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Regions to scan; discovered from the account when empty
    #[serde(default)]
    pub regions: Vec<String>,

    /// Named AWS profile to use; the default credential chain otherwise
    #[serde(default)]
    pub profile: Option<String>,

    /// Check overrides
    #[serde(default)]
    pub checks: HashMap<String, CheckConfig>,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            profile: None,
            checks: HashMap::new(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file or return default
    pub fn load_or_default() -> Result<Self, CloudLensError> {
        let config_path = Path::new(CONFIG_FILENAME);

        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, CloudLensError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CloudLensError::Config(ConfigError::FileRead {
                path: path.display().to_string(),
                source: e,
            })
        })?;

        toml::from_str(&content).map_err(|e| CloudLensError::Config(ConfigError::Parse(e)))
    }

    /// Check if a check is enabled
    pub fn is_check_enabled(&self, check_id: &str) -> bool {
        self.checks.get(check_id).map(|c| c.enabled).unwrap_or(true)
    }

    /// Disable a check
    pub fn disable_check(&mut self, check_id: impl Into<String>) {
        self.checks
            .insert(check_id.into(), CheckConfig { enabled: false });
    }
}
