//! The built-in check catalog
//!
//! One submodule per audited service. [`all`] is the single source of the
//! catalog; its order is the report order.

pub mod cloudtrail;
pub mod ecs;

use super::engine::Check;

/// Every built-in check, in stable report order
pub fn all() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(cloudtrail::MultiRegionTrailLoggingManagementEvents),
        Box::new(ecs::TaskDefinitionNoPlaintextSecrets),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_check_ids_are_unique() {
        let checks = all();
        let ids: HashSet<_> = checks.iter().map(|c| c.id()).collect();
        assert_eq!(ids.len(), checks.len());
    }

    #[test]
    fn test_every_check_names_a_service() {
        for check in all() {
            assert!(!check.service().is_empty());
            assert!(!check.title().is_empty());
        }
    }
}
