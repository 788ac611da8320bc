// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loader for vendor device plugins named in `device_framework.device_classes`.
//!
//! For each type name, in order: resolve it in the extension catalog, check
//! its declared interface, instantiate it, ask it to describe itself, reject
//! duplicate or unconfigured resource names, wrap it in an adapter, initialize
//! the adapter, and insert it into the map being built. Any failure aborts the
//! whole phase.

use std::sync::Arc;
use std::time::Duration;

use nodeplug_core::{
    Context, DevicePlugin, NodePlugError, RegistrationRequest, ResourceName, ResourcePlugin,
    Result,
};
use tracing::{info, warn};

use crate::adapter::DevicePluginAdapter;
use crate::catalog::CatalogValidator;
use crate::compat::{check_interface_compatibility, DEVICE_PLUGIN_CONTRACT};
use crate::extension::ExtensionCatalog;
use crate::mapping::DeviceMappingManager;
use crate::registry::PluginMap;

/// Loads, validates, and adapts vendor device plugins into a [`PluginMap`].
#[derive(Debug)]
pub struct PluggableLoader<'a> {
    extensions: &'a ExtensionCatalog,
    validator: CatalogValidator,
    mapping_manager: Arc<DeviceMappingManager>,
    registration_timeout: Option<Duration>,
}

impl<'a> PluggableLoader<'a> {
    pub fn new(
        extensions: &'a ExtensionCatalog,
        validator: CatalogValidator,
        mapping_manager: Arc<DeviceMappingManager>,
    ) -> Self {
        Self {
            extensions,
            validator,
            mapping_manager,
            registration_timeout: None,
        }
    }

    /// Bound the self-description call. `None` waits indefinitely.
    pub fn with_registration_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.registration_timeout = timeout;
        self
    }

    /// Load every type in `class_names`, in order, into `plugin_map`.
    ///
    /// `plugin_map` may already hold builtin plugins; their names count as taken.
    pub async fn load_all(
        &self,
        ctx: &Context,
        class_names: &[String],
        plugin_map: &mut PluginMap,
    ) -> Result<()> {
        info!(
            classes = class_names.len(),
            "pluggable device framework enabled, loading vendor plugins"
        );
        for class_name in class_names {
            let class_name = class_name.trim();
            if class_name.is_empty() {
                continue;
            }
            let (name, adapter) = self.load_one(ctx, class_name, plugin_map).await?;
            plugin_map.insert(name, adapter);
        }
        Ok(())
    }

    async fn load_one(
        &self,
        ctx: &Context,
        class_name: &str,
        plugin_map: &PluginMap,
    ) -> Result<(ResourceName, Arc<dyn ResourcePlugin>)> {
        let entry = self.extensions.resolve(class_name)?;
        check_interface_compatibility(&DEVICE_PLUGIN_CONTRACT, entry.descriptor())?;
        let plugin = entry.instantiate(ctx.conf())?;

        // TODO: run vendor calls on a blocking-tolerant task so a plugin that blocks
        // the thread inside register_request cannot defeat the timeout.
        let request = self.request_registration(class_name, plugin.as_ref()).await?;
        let name = request.resource_name;

        if plugin_map.contains_key(name.as_str()) {
            return Err(NodePlugError::DuplicateResourceType {
                name,
                class_name: class_name.to_string(),
            });
        }
        if !self.validator.is_configured(&name) {
            return Err(NodePlugError::UnconfiguredResourceType {
                name,
                class_name: class_name.to_string(),
            });
        }
        info!(
            resource = %name,
            class = class_name,
            version = request.plugin_version.as_deref().unwrap_or("unknown"),
            "new resource type registered"
        );

        let name = ResourceName::new(name);
        let adapter = DevicePluginAdapter::new(
            name.clone(),
            class_name,
            plugin,
            Arc::clone(&self.mapping_manager),
        );
        info!(class = class_name, "adapter created, initializing");
        adapter.initialize(ctx).await?;
        info!(class = class_name, "adapter initialized");

        let adapter: Arc<dyn ResourcePlugin> = Arc::new(adapter);
        Ok((name, adapter))
    }

    async fn request_registration(
        &self,
        class_name: &str,
        plugin: &dyn DevicePlugin,
    ) -> Result<RegistrationRequest> {
        let outcome = match self.registration_timeout {
            Some(limit) => match tokio::time::timeout(limit, plugin.register_request()).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(class = class_name, timeout = ?limit, "plugin did not describe itself in time");
                    return Err(NodePlugError::PluginRegistrationError {
                        class_name: class_name.to_string(),
                        message: format!("no registration request within {limit:?}"),
                        source: None,
                    });
                }
            },
            None => plugin.register_request().await,
        };

        outcome.map_err(|source| NodePlugError::PluginRegistrationError {
            class_name: class_name.to_string(),
            message: source.to_string(),
            source: Some(source),
        })
    }
}
