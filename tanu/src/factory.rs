//! Compiled-in skill factories.
//!
//! Each factory is registered under a fixed, documented name. Plugin units
//! refer to a factory by that name and hand it their declarative settings.

use crate::error::SkillResult;
use crate::skill::BoxedSkill;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A function that builds a skill from a unit's settings.
pub type SkillFactory = Arc<dyn Fn(&Value) -> SkillResult<BoxedSkill> + Send + Sync>;

/// Registry of named skill factories.
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    factories: BTreeMap<String, SkillFactory>,
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FactoryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any factory with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Value) -> SkillResult<BoxedSkill> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Value) -> SkillResult<BoxedSkill> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    /// Look up a factory by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SkillFactory> {
        self.factories.get(name)
    }

    /// Whether a factory with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered factory names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
