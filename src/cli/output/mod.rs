//! Output formatting module for CLI

pub mod json;
mod terminal;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

use crate::checks::results::ScanResults;
use crate::error::CloudLensError;

/// Trait for rendering scan report output
pub trait ReportRenderer {
    fn render_report(&self, results: &ScanResults) -> Result<String, CloudLensError>;
}
