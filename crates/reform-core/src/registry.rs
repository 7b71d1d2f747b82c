//! Namespace-keyed filter registry.
//!
//! Each namespace owns an ordered list of filters; registration order is
//! load-bearing because reform placement derives from a filter's position
//! (see [`crate::reform::paths`]). The registry is an explicit value built
//! once during application startup and passed by reference afterward; it is
//! read-only for the rest of the process, so shared access needs no locking.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::filters::Filter;

/// Ordered, namespace-keyed collection of filters.
#[derive(Default)]
pub struct FilterRegistry {
    // namespace -> filters in registration order
    entries: HashMap<String, Vec<Arc<dyn Filter>>>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sequence of filters under a namespace, preserving order.
    ///
    /// The namespace is created on first registration. Fails with
    /// `Unregisterable` for a filter with an unusable identity and
    /// `AlreadyRegistered` when a name is already taken in the namespace;
    /// filters registered before the failing one stay registered.
    pub fn register<I>(&mut self, namespace: &str, filters: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = Arc<dyn Filter>>,
    {
        for filter in filters {
            self.register_one(namespace, filter)?;
        }
        Ok(())
    }

    /// Register a single filter under a namespace.
    pub fn register_one(
        &mut self,
        namespace: &str,
        filter: Arc<dyn Filter>,
    ) -> Result<(), RegistryError> {
        if filter.name().is_empty() {
            return Err(RegistryError::Unregisterable(
                "filter name is empty".to_string(),
            ));
        }
        if filter.path_segment().is_empty() {
            return Err(RegistryError::Unregisterable(format!(
                "filter '{}' derives an empty path segment",
                filter.name()
            )));
        }

        let list = self.entries.entry(namespace.to_string()).or_default();
        // membership by identity name, not pointer equality
        if list.iter().any(|f| f.name() == filter.name()) {
            return Err(RegistryError::AlreadyRegistered {
                namespace: namespace.to_string(),
                name: filter.name().to_string(),
            });
        }
        tracing::debug!(
            "Registered filter '{}' in namespace '{}'",
            filter.name(),
            namespace
        );
        list.push(filter);
        Ok(())
    }

    /// The ordered filter list for a namespace.
    pub fn lookup(&self, namespace: &str) -> Result<&[Arc<dyn Filter>], RegistryError> {
        self.entries
            .get(namespace)
            .map(Vec::as_slice)
            .ok_or_else(|| RegistryError::NotRegistered(namespace.to_string()))
    }

    /// Find a filter by name within a namespace.
    pub fn find(&self, namespace: &str, name: &str) -> Option<Arc<dyn Filter>> {
        self.entries
            .get(namespace)?
            .iter()
            .find(|f| f.name() == name)
            .cloned()
    }

    /// Names of the filters registered in a namespace, in order.
    pub fn registered_names(&self, namespace: &str) -> Result<Vec<String>, RegistryError> {
        Ok(self
            .lookup(namespace)?
            .iter()
            .map(|f| f.name().to_string())
            .collect())
    }

    /// Registered namespaces, in no particular order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered namespaces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unregistration is unsupported by design; the attempt is rejected
    /// rather than silently ignored.
    pub fn unregister(&mut self, _namespace: &str, _name: &str) -> Result<(), RegistryError> {
        Err(RegistryError::UnregisterUnsupported)
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (namespace, list) in &self.entries {
            let names: Vec<&str> = list.iter().map(|filter| filter.name()).collect();
            map.entry(namespace, &names);
        }
        map.finish()
    }
}
