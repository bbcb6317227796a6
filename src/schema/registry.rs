// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::schema::TypeSpec;

/// Errors that can occur when interacting with the SpecRegistry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecRegistryError {
    AlreadyExists(Arc<str>),
    InvalidName(Arc<str>),
}

impl fmt::Display for SpecRegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecRegistryError::AlreadyExists(name) => {
                write!(f, "Spec registration failed: A type spec with the name '{name}' is already registered.")
            }
            SpecRegistryError::InvalidName(name) => {
                write!(f, "Spec registration failed: The name '{name}' is invalid (empty or whitespace-only names are not allowed).")
            }
        }
    }
}

impl std::error::Error for SpecRegistryError {}

/// Validates that a spec name is not empty or whitespace-only.
fn validate_name(name: &str) -> Result<(), SpecRegistryError> {
    if name.is_empty() || name.trim().is_empty() {
        Err(SpecRegistryError::InvalidName(Arc::from(name)))
    } else {
        Ok(())
    }
}

/// Thread-safe, write-once registry of generated type specs.
///
/// The schema compiler materializes every spec during process startup and
/// publishes it here; afterwards the registry is only read. There is
/// deliberately no removal or clearing.
#[derive(Clone, Default)]
pub struct SpecRegistry {
    inner: DashMap<Arc<str>, Arc<TypeSpec>>,
}

lazy_static::lazy_static! {
    /// Global singleton instance holding the specs emitted by the schema
    /// compiler, keyed by type identifier.
    pub static ref GENERATED_SPECS: SpecRegistry = SpecRegistry::new();
}

impl SpecRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Register a spec under a given name. Returns Err if the name is
    /// already taken; the first registration always wins.
    pub fn register(
        &self,
        name: impl Into<Arc<str>>,
        spec: Arc<TypeSpec>,
    ) -> Result<(), SpecRegistryError> {
        let name = name.into();

        validate_name(&name)?;

        use dashmap::mapref::entry::Entry;
        match self.inner.entry(name) {
            Entry::Occupied(e) => Err(SpecRegistryError::AlreadyExists(Arc::clone(e.key()))),
            Entry::Vacant(e) => {
                log::info!("registered type spec '{}'", e.key());
                e.insert(spec);
                Ok(())
            }
        }
    }

    /// Retrieve a spec by name, if it exists.
    pub fn get(&self, name: &str) -> Option<Arc<TypeSpec>> {
        self.inner.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// List all registered spec names.
    pub fn list_names(&self) -> Vec<Arc<str>> {
        self.inner.iter().map(|entry| Arc::clone(entry.key())).collect()
    }

    /// Check if a spec with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Get the number of registered specs.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
