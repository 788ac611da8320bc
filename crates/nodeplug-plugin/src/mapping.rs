// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared device-mapping state for dynamically loaded device plugins.
//!
//! One manager exists per registry. Every adapter records its plugin's device
//! set here so container assignment later sees all vendor devices in one place.
//! Assignment itself happens elsewhere.

use indexmap::IndexMap;
use nodeplug_core::{Context, Device, ResourceName};
use tokio::sync::RwLock;
use tracing::debug;

/// Device sets of every dynamically loaded plugin, keyed by resource name.
#[derive(Debug)]
pub struct DeviceMappingManager {
    ctx: Context,
    device_sets: RwLock<IndexMap<ResourceName, Vec<Device>>>,
}

impl DeviceMappingManager {
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            device_sets: RwLock::new(IndexMap::new()),
        }
    }

    /// Context the manager was created with.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Record (or replace) the device set served under `name`.
    pub async fn add_device_set(&self, name: ResourceName, devices: Vec<Device>) {
        debug!(resource = %name, count = devices.len(), "device set recorded");
        self.device_sets.write().await.insert(name, devices);
    }

    /// Forget the device set of `name`. Returns the removed devices.
    pub async fn remove_device_set(&self, name: &str) -> Option<Vec<Device>> {
        self.device_sets.write().await.shift_remove(name)
    }

    pub async fn device_set(&self, name: &str) -> Option<Vec<Device>> {
        self.device_sets.read().await.get(name).cloned()
    }

    /// Resource names with a recorded device set, in registration order.
    pub async fn resource_names(&self) -> Vec<ResourceName> {
        self.device_sets.read().await.keys().cloned().collect()
    }

    /// Copy of every device set, for restoring after a failed rebuild.
    pub(crate) async fn snapshot(&self) -> IndexMap<ResourceName, Vec<Device>> {
        self.device_sets.read().await.clone()
    }

    /// Replace every device set with `sets`.
    pub(crate) async fn restore(&self, sets: IndexMap<ResourceName, Vec<Device>>) {
        debug!(sets = sets.len(), "device sets restored");
        *self.device_sets.write().await = sets;
    }

    /// Total number of devices across all sets.
    pub async fn device_count(&self) -> usize {
        self.device_sets.read().await.values().map(Vec::len).sum()
    }
}
