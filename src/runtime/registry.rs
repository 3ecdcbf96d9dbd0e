//! Id → factory table
//!
//! Populated at startup. The runtime seals it on the first load; later
//! registrations are refused.

use std::collections::BTreeMap;

use crate::error::SimError;
use crate::sim::{SimContext, SimFactory, Simulation};

#[derive(Default)]
pub struct Registry {
    factories: BTreeMap<String, SimFactory>,
    sealed: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a factory. Returns false if the registry is sealed.
    /// Re-registering an id replaces the previous factory.
    pub fn register<F>(&mut self, id: &str, factory: F) -> bool
    where
        F: Fn(&mut SimContext<'_>) -> Result<Box<dyn Simulation>, SimError> + 'static,
    {
        if self.sealed {
            log::warn!("Registry is sealed; ignoring registration of '{}'", id);
            return false;
        }
        if self.factories.insert(id.to_string(), Box::new(factory)).is_some() {
            log::warn!("Simulation '{}' registered twice; keeping the latest", id);
        }
        true
    }

    pub fn get(&self, id: &str) -> Option<&SimFactory> {
        self.factories.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("ids", &self.ids())
            .field("sealed", &self.sealed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing(_: &mut SimContext<'_>) -> Result<Box<dyn Simulation>, SimError> {
        Err(SimError::Setup("unused".into()))
    }

    #[test]
    fn test_register_and_seal() {
        let mut registry = Registry::new();
        assert!(registry.register("b", failing));
        assert!(registry.register("a", failing));
        assert_eq!(registry.ids(), vec!["a", "b"]);
        assert!(registry.contains("a"));
        assert!(!registry.contains("c"));

        registry.seal();
        assert!(!registry.register("c", failing));
        assert_eq!(registry.len(), 2);
    }
}
