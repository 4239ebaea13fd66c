//! Group Registry Module
//!
//! Name-to-group lookup owned by whoever composes the node.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::error::{CacheError, Result};
use crate::group::{Getter, Group};

// == Group Registry ==
/// Holds every group a node serves, keyed by name.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == New Group ==
    /// Creates and registers a group.
    ///
    /// Fails with `AlreadyRegistered` if the name is taken and with
    /// `InvalidArgument` if it is empty.
    pub fn new_group(
        &self,
        name: &str,
        cache_bytes: usize,
        getter: Arc<dyn Getter>,
    ) -> Result<Arc<Group>> {
        if name.is_empty() {
            return Err(CacheError::InvalidArgument("empty group name".to_string()));
        }

        let mut groups = self.groups.write();
        if groups.contains_key(name) {
            return Err(CacheError::AlreadyRegistered(format!("group '{}'", name)));
        }

        let group = Arc::new(Group::new(name, cache_bytes, getter));
        groups.insert(name.to_string(), group.clone());
        info!(group = name, cache_bytes, "group registered");
        Ok(group)
    }

    // == Get ==
    /// Looks up a group by name.
    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Registered group names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GetterFn;

    fn echo() -> Arc<dyn Getter> {
        Arc::new(GetterFn(|key: &str| Ok(key.as_bytes().to_vec())))
    }

    #[test]
    fn test_new_group_and_lookup() {
        let registry = GroupRegistry::new();
        let group = registry.new_group("scores", 1024, echo()).unwrap();

        let found = registry.get("scores").unwrap();
        assert!(Arc::ptr_eq(&group, &found));
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.names(), vec!["scores".to_string()]);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let registry = GroupRegistry::new();
        let first = registry.new_group("scores", 1024, echo()).unwrap();

        let result = registry.new_group("scores", 2048, echo());
        assert!(matches!(result, Err(CacheError::AlreadyRegistered(_))));
        assert!(Arc::ptr_eq(&first, &registry.get("scores").unwrap()));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let registry = GroupRegistry::new();
        let result = registry.new_group("", 1024, echo());
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registries_are_independent() {
        let a = GroupRegistry::new();
        let b = GroupRegistry::new();
        a.new_group("scores", 1024, echo()).unwrap();

        assert!(b.get("scores").is_none());
        assert!(b.new_group("scores", 1024, echo()).is_ok());
        assert_eq!(a.len(), 1);
    }
}
