// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contract implemented by vendor-supplied device plugins.

use async_trait::async_trait;

use crate::error::BoxError;
use crate::types::{Device, RegistrationRequest};

/// A vendor device plugin, loaded by type name at node startup.
///
/// Errors are opaque to the registry; it wraps them into the matching
/// registry error depending on which phase failed.
#[async_trait]
pub trait DevicePlugin: Send + Sync + 'static {
    /// Describe the resource type this plugin serves.
    async fn register_request(&self) -> Result<RegistrationRequest, BoxError>;

    /// Enumerate the devices currently present on the node.
    async fn devices(&self) -> Result<Vec<Device>, BoxError>;

    /// Notification that `devices` were assigned to a container.
    async fn on_devices_allocated(&self, devices: &[Device]) -> Result<(), BoxError>;

    /// Notification that `devices` were returned to the pool.
    async fn on_devices_released(&self, devices: &[Device]) -> Result<(), BoxError>;

    /// Release vendor resources. Called once when the registry is cleaned up.
    async fn cleanup(&self) -> Result<(), BoxError>;
}
