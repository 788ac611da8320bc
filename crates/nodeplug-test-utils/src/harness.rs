// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builder for a registry, its context, and its catalogs in one go.

use std::sync::Arc;

use nodeplug_config::NodePlugConfig;
use nodeplug_core::{Context, DevicePlugin};
use nodeplug_plugin::{
    ConfiguredResourceTypes, ExtensionCatalog, PluginDescriptor, ResourcePluginRegistry,
};

use crate::mock_device::{CleanupJournal, MockDevicePlugin};

/// Accumulates configuration and extensions, then builds a registry.
///
/// Every device plugin added through the harness reports cleanups into the
/// harness journal.
#[derive(Debug, Default)]
pub struct TestHarness {
    config: NodePlugConfig,
    extensions: ExtensionCatalog,
    journal: CleanupJournal,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builtin plugin names, exactly as they would appear in config.
    pub fn with_builtins(mut self, names: &[&str]) -> Self {
        self.config.plugins.builtin = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Enable the device framework with an empty class list.
    pub fn with_device_framework(mut self) -> Self {
        self.config.device_framework.enabled = true;
        self.config.device_framework.device_classes.get_or_insert_with(Vec::new);
        self
    }

    pub fn with_registration_timeout_secs(mut self, secs: u64) -> Self {
        self.config.device_framework.registration_timeout_secs = secs;
        self
    }

    /// Add a resource type to the catalog.
    pub fn with_resource_type(mut self, name: &str) -> Self {
        self.config
            .resource_types
            .insert(name.to_string(), Default::default());
        self
    }

    /// Register `plugin` under `class_name` and append the class to the load list.
    pub fn with_device_plugin(self, class_name: &str, plugin: MockDevicePlugin) -> Self {
        let descriptor = PluginDescriptor::device_plugin(class_name);
        self.with_extension(descriptor, plugin)
    }

    /// Register `plugin` with an explicit descriptor and append it to the load list.
    pub fn with_extension(mut self, descriptor: PluginDescriptor, plugin: MockDevicePlugin) -> Self {
        let class_name = descriptor.type_name.clone();
        let plugin = plugin.with_journal(self.journal.clone());
        self.extensions
            .register(descriptor, move |_| {
                let instance: Box<dyn DevicePlugin> = Box::new(plugin.clone());
                Ok(instance)
            })
            .unwrap_or_else(|e| panic!("test harness extension registration failed: {e}"));
        self = self.with_device_framework();
        self.config
            .device_framework
            .device_classes
            .get_or_insert_with(Vec::new)
            .push(class_name);
        self
    }

    /// Append a class name to the load list without registering an extension.
    pub fn with_class_name(mut self, class_name: &str) -> Self {
        self = self.with_device_framework();
        self.config
            .device_framework
            .device_classes
            .get_or_insert_with(Vec::new)
            .push(class_name.to_string());
        self
    }

    /// Escape hatch for settings without a dedicated builder method.
    pub fn configure(mut self, f: impl FnOnce(&mut NodePlugConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn journal(&self) -> CleanupJournal {
        self.journal.clone()
    }

    pub fn config(&self) -> &NodePlugConfig {
        &self.config
    }

    /// Build the registry and a context over the accumulated config.
    pub fn build(self) -> (ResourcePluginRegistry, Context) {
        let catalog = ConfiguredResourceTypes::from_config(&self.config);
        let registry = ResourcePluginRegistry::new(self.extensions, Arc::new(catalog));
        (registry, Context::new(self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_plugins_are_listed_in_order() {
        let harness = TestHarness::new()
            .with_device_plugin("com.vendor.B", MockDevicePlugin::new("b"))
            .with_device_plugin("com.vendor.A", MockDevicePlugin::new("a"));
        let framework = &harness.config().device_framework;
        assert!(framework.enabled);
        assert_eq!(
            framework.device_classes.as_deref(),
            Some(&["com.vendor.B".to_string(), "com.vendor.A".to_string()][..])
        );
    }

    #[test]
    fn builtins_only_leaves_framework_disabled() {
        let harness = TestHarness::new().with_builtins(&["gpu"]);
        assert!(!harness.config().device_framework.enabled);
        assert_eq!(harness.config().plugins.builtin, vec!["gpu"]);
    }
}
