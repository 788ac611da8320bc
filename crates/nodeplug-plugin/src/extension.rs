// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extension catalog: resolves fully-qualified type names to plugin factories.
//!
//! Vendor crates linked into the node register their device plugin types here
//! under the name operators put in `device_framework.device_classes`. The
//! loader resolves names through this catalog instead of the compiler, so the
//! registry only learns at startup which extensions exist.

use std::collections::HashMap;
use std::sync::Arc;

use nodeplug_config::NodePlugConfig;
use nodeplug_core::{BoxError, DevicePlugin, NodePlugError, Result};
use tracing::debug;

use crate::compat::PluginDescriptor;

/// Constructs a device plugin from the ambient configuration.
pub type ExtensionFactory =
    Arc<dyn Fn(&NodePlugConfig) -> std::result::Result<Box<dyn DevicePlugin>, BoxError> + Send + Sync>;

/// A registered extension type.
#[derive(Clone)]
pub struct ExtensionEntry {
    descriptor: PluginDescriptor,
    factory: ExtensionFactory,
}

impl std::fmt::Debug for ExtensionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionEntry")
            .field("descriptor", &self.descriptor)
            .field("factory", &"<fn>")
            .finish()
    }
}

impl ExtensionEntry {
    /// What the extension declares about itself.
    pub fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    /// Build a fresh instance. A factory failure means the type is not instantiable.
    pub fn instantiate(&self, conf: &NodePlugConfig) -> Result<Box<dyn DevicePlugin>> {
        (self.factory)(conf).map_err(|source| NodePlugError::ClassLoadError {
            class_name: self.descriptor.type_name.clone(),
            reason: "type could not be instantiated".to_string(),
            source: Some(source),
        })
    }
}

/// Extensions known to this node, keyed by fully-qualified type name.
#[derive(Debug, Clone, Default)]
pub struct ExtensionCatalog {
    entries: HashMap<String, ExtensionEntry>,
}

impl ExtensionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension with an explicit descriptor.
    ///
    /// Fails if the type name is already taken.
    pub fn register<F>(&mut self, descriptor: PluginDescriptor, factory: F) -> Result<()>
    where
        F: Fn(&NodePlugConfig) -> std::result::Result<Box<dyn DevicePlugin>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        let type_name = descriptor.type_name.clone();
        if self.entries.contains_key(&type_name) {
            return Err(NodePlugError::Config(format!(
                "extension type `{type_name}` is registered twice"
            )));
        }
        debug!(class = %type_name, contract = descriptor.contract, "extension type registered");
        self.entries.insert(
            type_name,
            ExtensionEntry {
                descriptor,
                factory: Arc::new(factory),
            },
        );
        Ok(())
    }

    /// Register a complete device plugin implementation under `type_name`.
    pub fn register_device_plugin<F>(&mut self, type_name: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn(&NodePlugConfig) -> std::result::Result<Box<dyn DevicePlugin>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.register(PluginDescriptor::device_plugin(type_name), factory)
    }

    /// Look up an extension by fully-qualified type name.
    pub fn resolve(&self, type_name: &str) -> Result<&ExtensionEntry> {
        self.entries.get(type_name).ok_or_else(|| {
            NodePlugError::class_load(type_name, "no extension is registered under this type name")
        })
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
