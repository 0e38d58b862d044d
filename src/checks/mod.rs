//! Checks module - Posture checks and evaluation engine

pub mod catalog;
pub mod engine;
pub mod patterns;
pub mod results;

pub use engine::{Check, CheckEngine, ScanInventory};
pub use results::{Finding, ScanResults, Severity, Status};
