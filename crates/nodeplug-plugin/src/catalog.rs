// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource-type catalog and the validator the loader checks names against.
//!
//! The catalog is owned outside the registry. [`ConfiguredResourceTypes`]
//! builds one from the `[resource_types]` config section; the two mandatory
//! types (`memory-mb`, `vcores`) are always present.

use std::collections::BTreeMap;
use std::sync::Arc;

use nodeplug_config::{NodePlugConfig, ResourceTypeConfig};

/// Mandatory memory resource type.
pub const MEMORY_MB: &str = "memory-mb";

/// Mandatory CPU resource type.
pub const VCORES: &str = "vcores";

/// Descriptor of one configured resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTypeInfo {
    pub name: String,
    pub units: String,
    pub minimum_allocation: i64,
    pub maximum_allocation: i64,
}

impl ResourceTypeInfo {
    fn from_config(name: &str, config: &ResourceTypeConfig) -> Self {
        Self {
            name: name.to_string(),
            units: config.units.clone(),
            minimum_allocation: config.minimum_allocation,
            maximum_allocation: config.maximum_allocation,
        }
    }
}

/// Read-only view of the cluster's resource-type catalog.
pub trait ResourceTypeCatalog: Send + Sync {
    /// Descriptor for `name`, if the type is configured.
    fn get(&self, name: &str) -> Option<&ResourceTypeInfo>;

    /// All configured types, ordered by name.
    fn resource_types(&self) -> Vec<&ResourceTypeInfo>;

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Catalog backed by the node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredResourceTypes {
    types: BTreeMap<String, ResourceTypeInfo>,
}

impl ConfiguredResourceTypes {
    /// Catalog holding only the mandatory types.
    pub fn mandatory() -> Self {
        let mut types = BTreeMap::new();
        types.insert(
            MEMORY_MB.to_string(),
            ResourceTypeInfo {
                name: MEMORY_MB.to_string(),
                units: "Mi".to_string(),
                minimum_allocation: 0,
                maximum_allocation: i64::MAX,
            },
        );
        types.insert(
            VCORES.to_string(),
            ResourceTypeInfo {
                name: VCORES.to_string(),
                units: String::new(),
                minimum_allocation: 0,
                maximum_allocation: i64::MAX,
            },
        );
        Self { types }
    }

    /// Mandatory types plus everything under `[resource_types]`.
    ///
    /// A configured entry for a mandatory type overrides its defaults.
    pub fn from_config(config: &NodePlugConfig) -> Self {
        let mut catalog = Self::mandatory();
        for (name, rt) in &config.resource_types {
            catalog
                .types
                .insert(name.clone(), ResourceTypeInfo::from_config(name, rt));
        }
        catalog
    }

    /// Add a countable type with default bounds. Mostly useful in tests.
    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.types.insert(
            name.clone(),
            ResourceTypeInfo::from_config(&name, &ResourceTypeConfig::default()),
        );
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl ResourceTypeCatalog for ConfiguredResourceTypes {
    fn get(&self, name: &str) -> Option<&ResourceTypeInfo> {
        self.types.get(name)
    }

    fn resource_types(&self) -> Vec<&ResourceTypeInfo> {
        self.types.values().collect()
    }
}

/// Answers whether a resource type name exists in the catalog.
///
/// Pure lookup: no caching, no mutation.
#[derive(Clone)]
pub struct CatalogValidator {
    catalog: Arc<dyn ResourceTypeCatalog>,
}

impl std::fmt::Debug for CatalogValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogValidator")
            .field("types", &self.catalog.resource_types().len())
            .finish()
    }
}

impl CatalogValidator {
    pub fn new(catalog: Arc<dyn ResourceTypeCatalog>) -> Self {
        Self { catalog }
    }

    pub fn is_configured(&self, resource_name: &str) -> bool {
        self.catalog.contains(resource_name)
    }
}
