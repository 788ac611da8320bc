// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builtin resource plugins and the factory that creates them by name.
//!
//! Device discovery for GPUs and FPGAs lives behind these plugins and is not
//! part of the registry; the plugins here track lifecycle only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use nodeplug_core::{BuiltinResource, Context, NodePlugError, ResourcePlugin, Result};
use strum::IntoEnumIterator;
use tracing::{debug, info};

/// Names accepted on the builtin registration path.
pub fn supported_resource_plugins() -> Vec<&'static str> {
    BuiltinResource::iter().map(|r| r.as_str()).collect()
}

/// Create the builtin plugin registered under `name`.
///
/// Callers check the allow-list first; any other name here is a bug.
pub fn create_builtin_plugin(name: &str) -> Result<Arc<dyn ResourcePlugin>> {
    if name == BuiltinResource::Gpu.as_str() {
        Ok(Arc::new(GpuResourcePlugin::new()))
    } else if name == BuiltinResource::Fpga.as_str() {
        Ok(Arc::new(FpgaResourcePlugin::new()))
    } else {
        Err(NodePlugError::InternalInvariantViolation(format!(
            "builtin plugin `{name}` passed the allow-list but has no constructor"
        )))
    }
}

/// Builtin handler for GPU resources.
#[derive(Debug, Default)]
pub struct GpuResourcePlugin {
    initialized: AtomicBool,
}

impl GpuResourcePlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }
}

#[async_trait]
impl ResourcePlugin for GpuResourcePlugin {
    fn describe(&self) -> String {
        "GpuResourcePlugin".to_string()
    }

    async fn initialize(&self, ctx: &Context) -> Result<()> {
        debug!(log_level = %ctx.conf().node.log_level, "initializing gpu resource plugin");
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    async fn cleanup(&self) -> Result<()> {
        if self.initialized.swap(false, Ordering::AcqRel) {
            info!("gpu resource plugin cleaned up");
        }
        Ok(())
    }
}

/// Builtin handler for FPGA resources.
#[derive(Debug, Default)]
pub struct FpgaResourcePlugin {
    initialized: AtomicBool,
}

impl FpgaResourcePlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }
}

#[async_trait]
impl ResourcePlugin for FpgaResourcePlugin {
    fn describe(&self) -> String {
        "FpgaResourcePlugin".to_string()
    }

    async fn initialize(&self, ctx: &Context) -> Result<()> {
        debug!(log_level = %ctx.conf().node.log_level, "initializing fpga resource plugin");
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    async fn cleanup(&self) -> Result<()> {
        if self.initialized.swap(false, Ordering::AcqRel) {
            info!("fpga resource plugin cleaned up");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeplug_config::NodePlugConfig;

    #[test]
    fn allow_list_is_gpu_and_fpga() {
        assert_eq!(supported_resource_plugins(), vec!["gpu", "fpga"]);
    }

    #[test]
    fn factory_builds_each_supported_name() {
        assert_eq!(create_builtin_plugin("gpu").unwrap().describe(), "GpuResourcePlugin");
        assert_eq!(create_builtin_plugin("fpga").unwrap().describe(), "FpgaResourcePlugin");
    }

    #[test]
    fn factory_rejects_unknown_as_invariant_violation() {
        let err = create_builtin_plugin("tpu").err().expect("tpu has no builtin");
        assert!(matches!(err, NodePlugError::InternalInvariantViolation(_)));
    }

    #[tokio::test]
    async fn lifecycle_can_repeat() {
        let ctx = Context::new(NodePlugConfig::default());
        let plugin = GpuResourcePlugin::new();
        assert!(!plugin.is_initialized());
        plugin.initialize(&ctx).await.unwrap();
        assert!(plugin.is_initialized());
        plugin.cleanup().await.unwrap();
        assert!(!plugin.is_initialized());
        plugin.initialize(&ctx).await.unwrap();
        assert!(plugin.is_initialized());
    }
}
