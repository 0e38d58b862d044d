//! Per-service canonical records, normalization and collectors
//!
//! One submodule per audited AWS service. Each exposes a `SERVICE`
//! identifier, a canonical record type, a pure normalizer from the raw
//! provider payloads, and an async `collect` that fans out across regions
//! through the machinery in [`crate::inventory`].

pub mod cloudtrail;
pub mod ecs;
