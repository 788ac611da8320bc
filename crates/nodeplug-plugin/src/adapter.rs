// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter conforming a vendor [`DevicePlugin`] to the registry's [`ResourcePlugin`].

use std::sync::Arc;

use async_trait::async_trait;
use nodeplug_core::{Context, DevicePlugin, NodePlugError, ResourceName, ResourcePlugin, Result};
use tracing::{info, warn};

use crate::mapping::DeviceMappingManager;

/// Wraps a dynamically loaded device plugin together with the shared mapping manager.
pub struct DevicePluginAdapter {
    resource_name: ResourceName,
    class_name: String,
    plugin: Box<dyn DevicePlugin>,
    mapping_manager: Arc<DeviceMappingManager>,
}

impl std::fmt::Debug for DevicePluginAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevicePluginAdapter")
            .field("resource_name", &self.resource_name)
            .field("class_name", &self.class_name)
            .finish_non_exhaustive()
    }
}

impl DevicePluginAdapter {
    pub fn new(
        resource_name: ResourceName,
        class_name: impl Into<String>,
        plugin: Box<dyn DevicePlugin>,
        mapping_manager: Arc<DeviceMappingManager>,
    ) -> Self {
        Self {
            resource_name,
            class_name: class_name.into(),
            plugin,
            mapping_manager,
        }
    }

    pub fn mapping_manager(&self) -> &Arc<DeviceMappingManager> {
        &self.mapping_manager
    }
}

#[async_trait]
impl ResourcePlugin for DevicePluginAdapter {
    fn describe(&self) -> String {
        format!("device plugin adapter for {} ({})", self.resource_name, self.class_name)
    }

    /// Fetch the plugin's devices and publish them to the mapping manager.
    async fn initialize(&self, _ctx: &Context) -> Result<()> {
        let devices = self
            .plugin
            .devices()
            .await
            .map_err(|source| NodePlugError::AdapterInitError {
                class_name: self.class_name.clone(),
                name: self.resource_name.to_string(),
                source,
            })?;

        if devices.is_empty() {
            warn!(resource = %self.resource_name, class = %self.class_name, "device plugin reported no devices");
        }
        info!(
            resource = %self.resource_name,
            devices = devices.len(),
            "device plugin adapter initialized"
        );
        self.mapping_manager
            .add_device_set(self.resource_name.clone(), devices)
            .await;
        Ok(())
    }

    async fn cleanup(&self) -> Result<()> {
        self.plugin
            .cleanup()
            .await
            .map_err(|source| NodePlugError::PluginCleanupError {
                name: self.resource_name.to_string(),
                source,
            })?;
        self.mapping_manager
            .remove_device_set(self.resource_name.as_str())
            .await;
        Ok(())
    }
}
