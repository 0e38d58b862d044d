//! Utility modules for CloudLens

pub mod timing;
