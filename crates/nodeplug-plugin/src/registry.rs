// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of the resource plugins active on this node.
//!
//! `initialize` builds a fresh [`PluginMap`] privately (builtins first, then
//! vendor device plugins) and publishes it in one atomic store. Readers load
//! the current snapshot without locking and never observe a half-built map.
//! `initialize` and `cleanup` serialize on a single writer lock.
//!
//! The device mapping manager is built once and shared by every adapter. A
//! failed `initialize` restores its device sets to what they were before the
//! attempt, so the published adapters keep seeing their own devices.

use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use nodeplug_core::{BuiltinResource, Context, NodePlugError, ResourceName, ResourcePlugin, Result};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::builtin::{create_builtin_plugin, supported_resource_plugins};
use crate::catalog::{CatalogValidator, ResourceTypeCatalog};
use crate::extension::ExtensionCatalog;
use crate::loader::PluggableLoader;
use crate::mapping::DeviceMappingManager;

/// Resource name to plugin, in registration order.
pub type PluginMap = IndexMap<ResourceName, Arc<dyn ResourcePlugin>>;

/// Owns the sealed name-to-plugin mapping and drives plugin lifecycle.
pub struct ResourcePluginRegistry {
    configured: ArcSwap<PluginMap>,
    /// Built by the first `initialize` that reaches the device framework.
    device_mapping: OnceLock<Arc<DeviceMappingManager>>,
    /// Published once an `initialize` using `device_mapping` succeeds.
    mapping_manager: OnceLock<Arc<DeviceMappingManager>>,
    writer: Mutex<()>,
    extensions: ExtensionCatalog,
    catalog: Arc<dyn ResourceTypeCatalog>,
}

impl std::fmt::Debug for ResourcePluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<ResourceName> = self.configured.load().keys().cloned().collect();
        f.debug_struct("ResourcePluginRegistry")
            .field("plugins", &names)
            .field("mapping_manager", &self.mapping_manager.get().is_some())
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

impl ResourcePluginRegistry {
    /// Create an empty registry.
    ///
    /// `extensions` lists the vendor types that can be loaded by name;
    /// `catalog` is the resource-type catalog vendor names are checked against.
    pub fn new(extensions: ExtensionCatalog, catalog: Arc<dyn ResourceTypeCatalog>) -> Self {
        Self {
            configured: ArcSwap::from_pointee(PluginMap::new()),
            device_mapping: OnceLock::new(),
            mapping_manager: OnceLock::new(),
            writer: Mutex::new(()),
            extensions,
            catalog,
        }
    }

    /// Build and publish the plugin mapping from `ctx`'s configuration.
    ///
    /// On error nothing is published; plugins initialized during the failed
    /// attempt are cleaned up, the mapping manager's device sets are put back,
    /// and the previous mapping stays visible.
    pub async fn initialize(&self, ctx: &Context) -> Result<()> {
        let _writer = self.writer.lock().await;
        let mut plugin_map = PluginMap::new();
        let saved_devices = match self.device_mapping.get() {
            Some(manager) => manager.snapshot().await,
            None => IndexMap::new(),
        };

        match self.build(ctx, &mut plugin_map).await {
            Ok(manager) => {
                if let Some(manager) = manager {
                    // Already set only when it is this same instance.
                    let _ = self.mapping_manager.set(manager);
                }
                info!(plugins = plugin_map.len(), "resource plugin mapping published");
                self.configured.store(Arc::new(plugin_map));
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "resource plugin initialization failed");
                rollback(&plugin_map).await;
                if let Some(manager) = self.device_mapping.get() {
                    manager.restore(saved_devices).await;
                }
                Err(err)
            }
        }
    }

    async fn build(
        &self,
        ctx: &Context,
        plugin_map: &mut PluginMap,
    ) -> Result<Option<Arc<DeviceMappingManager>>> {
        let conf = ctx.conf();
        let builtin = &conf.plugins.builtin;

        if builtin.is_empty() {
            info!("no resource plugins found in configuration");
        } else {
            info!(plugins = ?builtin, "found resource plugins in configuration");
        }

        for raw in builtin {
            let name = raw.trim();
            if BuiltinResource::from_str(name).is_err() {
                let supported = supported_resource_plugins().join(",");
                error!(plugin = name, supported = %supported, "resource plugin is not supported");
                return Err(NodePlugError::UnsupportedResourceType {
                    name: name.to_string(),
                    supported,
                });
            }
            if plugin_map.contains_key(name) {
                warn!(plugin = name, "ignoring duplicate resource plugin definition");
                continue;
            }

            let plugin = create_builtin_plugin(name)?;
            plugin.initialize(ctx).await?;
            info!(plugin = %plugin.describe(), "initialized resource plugin");
            plugin_map.insert(ResourceName::from(name), plugin);
        }

        let framework = &conf.device_framework;
        if !framework.enabled {
            info!("pluggable device framework is not enabled, set device_framework.enabled = true to load vendor plugins");
            return Ok(None);
        }

        let class_names = framework.device_classes.as_deref().ok_or_else(|| {
            NodePlugError::Config(
                "device_framework.enabled is true but device_framework.device_classes is not set"
                    .to_string(),
            )
        })?;
        let manager = Arc::clone(
            self.device_mapping
                .get_or_init(|| Arc::new(DeviceMappingManager::new(ctx))),
        );
        let timeout = match framework.registration_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        PluggableLoader::new(
            &self.extensions,
            CatalogValidator::new(Arc::clone(&self.catalog)),
            Arc::clone(&manager),
        )
        .with_registration_timeout(timeout)
        .load_all(ctx, class_names, plugin_map)
        .await?;

        Ok(Some(manager))
    }

    /// Clean up every plugin in the sealed mapping, in registration order.
    ///
    /// Stops at the first failure and returns it.
    pub async fn cleanup(&self) -> Result<()> {
        let _writer = self.writer.lock().await;
        let plugins = self.configured.load_full();
        for (name, plugin) in plugins.iter() {
            plugin.cleanup().await.map_err(|err| cleanup_error(name, err))?;
        }
        info!(plugins = plugins.len(), "resource plugins cleaned up");
        Ok(())
    }

    /// The sealed mapping as of the last successful `initialize`.
    pub fn name_to_plugins(&self) -> Arc<PluginMap> {
        self.configured.load_full()
    }

    /// Plugin registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ResourcePlugin>> {
        self.configured.load().get(name).cloned()
    }

    /// The shared device mapping manager, present once the device framework
    /// has been initialized successfully.
    pub fn mapping_manager(&self) -> Option<Arc<DeviceMappingManager>> {
        self.mapping_manager.get().cloned()
    }

}

fn cleanup_error(name: &ResourceName, err: NodePlugError) -> NodePlugError {
    match err {
        err @ NodePlugError::PluginCleanupError { .. } => err,
        other => NodePlugError::PluginCleanupError {
            name: name.to_string(),
            source: Box::new(other),
        },
    }
}

/// Undo a failed build, newest plugin first. Failures are logged, not raised.
async fn rollback(plugin_map: &PluginMap) {
    for (name, plugin) in plugin_map.iter().rev() {
        if let Err(err) = plugin.cleanup().await {
            warn!(plugin = %name, error = %err, "cleanup after failed initialization failed");
        }
    }
}
