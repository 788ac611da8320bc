// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock vendor device plugin for deterministic registry tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nodeplug_core::{BoxError, Device, DevicePlugin, RegistrationRequest};
use tokio::sync::Mutex;

/// Shared, ordered record of which resource names were cleaned up.
#[derive(Debug, Clone, Default)]
pub struct CleanupJournal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CleanupJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, name: &str) {
        self.entries.lock().await.push(name.to_string());
    }

    /// All recorded names, oldest first.
    pub async fn entries(&self) -> Vec<String> {
        self.entries.lock().await.clone()
    }

    /// How many times `name` was cleaned up.
    pub async fn count(&self, name: &str) -> usize {
        self.entries.lock().await.iter().filter(|e| *e == name).count()
    }
}

/// A device plugin whose behavior is configured up front.
///
/// Cloning shares the journal and the call counters, so a clone handed to an
/// extension factory reports into the same place as the original.
#[derive(Debug, Clone)]
pub struct MockDevicePlugin {
    resource_name: String,
    devices: Vec<Device>,
    register_error: Option<String>,
    devices_error: Option<String>,
    cleanup_error: Option<String>,
    register_delay: Option<Duration>,
    journal: CleanupJournal,
    register_calls: Arc<AtomicUsize>,
}

impl MockDevicePlugin {
    /// A well-behaved plugin serving `resource_name` with one healthy device.
    pub fn new(resource_name: impl Into<String>) -> Self {
        let resource_name = resource_name.into();
        Self {
            devices: vec![Device::new(0, format!("/dev/{resource_name}0"))],
            resource_name,
            register_error: None,
            devices_error: None,
            cleanup_error: None,
            register_delay: None,
            journal: CleanupJournal::new(),
            register_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_devices(mut self, devices: Vec<Device>) -> Self {
        self.devices = devices;
        self
    }

    /// Make `register_request` fail with `message`.
    pub fn failing_registration(mut self, message: impl Into<String>) -> Self {
        self.register_error = Some(message.into());
        self
    }

    /// Make `devices` fail with `message`.
    pub fn failing_devices(mut self, message: impl Into<String>) -> Self {
        self.devices_error = Some(message.into());
        self
    }

    /// Make `cleanup` fail with `message`. The call is still journaled.
    pub fn failing_cleanup(mut self, message: impl Into<String>) -> Self {
        self.cleanup_error = Some(message.into());
        self
    }

    /// Sleep for `delay` before answering `register_request`.
    pub fn stalling_registration(mut self, delay: Duration) -> Self {
        self.register_delay = Some(delay);
        self
    }

    pub fn with_journal(mut self, journal: CleanupJournal) -> Self {
        self.journal = journal;
        self
    }

    pub fn journal(&self) -> &CleanupJournal {
        &self.journal
    }

    /// Number of `register_request` calls across all clones.
    pub fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DevicePlugin for MockDevicePlugin {
    async fn register_request(&self) -> Result<RegistrationRequest, BoxError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.register_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.register_error {
            Some(message) => Err(message.clone().into()),
            None => Ok(RegistrationRequest::new(&self.resource_name).with_version("0.1.0")),
        }
    }

    async fn devices(&self) -> Result<Vec<Device>, BoxError> {
        match &self.devices_error {
            Some(message) => Err(message.clone().into()),
            None => Ok(self.devices.clone()),
        }
    }

    async fn on_devices_allocated(&self, _devices: &[Device]) -> Result<(), BoxError> {
        Ok(())
    }

    async fn on_devices_released(&self, _devices: &[Device]) -> Result<(), BoxError> {
        Ok(())
    }

    async fn cleanup(&self) -> Result<(), BoxError> {
        self.journal.record(&self.resource_name).await;
        match &self.cleanup_error {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_journal_and_counters() {
        let mock = MockDevicePlugin::new("accel-x");
        let clone = mock.clone();
        clone.register_request().await.unwrap();
        clone.cleanup().await.unwrap();
        assert_eq!(mock.register_calls(), 1);
        assert_eq!(mock.journal().entries().await, vec!["accel-x"]);
    }

    #[tokio::test]
    async fn injected_failures_surface() {
        let mock = MockDevicePlugin::new("accel-x")
            .failing_registration("sdk missing")
            .failing_devices("no driver")
            .failing_cleanup("busy");
        assert_eq!(mock.register_request().await.unwrap_err().to_string(), "sdk missing");
        assert_eq!(mock.devices().await.unwrap_err().to_string(), "no driver");
        assert_eq!(mock.cleanup().await.unwrap_err().to_string(), "busy");
        assert_eq!(mock.journal().count("accel-x").await, 1);
    }

    #[tokio::test]
    async fn default_device_is_named_after_resource() {
        let devices = MockDevicePlugin::new("nic").devices().await.unwrap();
        assert_eq!(devices, vec![Device::new(0, "/dev/nic0")]);
    }
}
