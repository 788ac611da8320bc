// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource plugin registry for a cluster worker node.
//!
//! The registry activates builtin resource plugins (GPU, FPGA) by name and,
//! when the pluggable device framework is enabled, loads vendor device plugins
//! by fully-qualified type name from an [`ExtensionCatalog`]. Vendor plugins are
//! checked against the device plugin contract and the resource-type catalog
//! before an adapter makes them available next to the builtins.

pub mod adapter;
pub mod builtin;
pub mod catalog;
pub mod compat;
pub mod extension;
pub mod loader;
pub mod mapping;
pub mod registry;

pub use adapter::DevicePluginAdapter;
pub use builtin::{
    create_builtin_plugin, supported_resource_plugins, FpgaResourcePlugin, GpuResourcePlugin,
};
pub use catalog::{CatalogValidator, ConfiguredResourceTypes, ResourceTypeCatalog, ResourceTypeInfo};
pub use compat::{
    check_interface_compatibility, Contract, OperationSignature, PluginDescriptor,
    DEVICE_PLUGIN_CONTRACT,
};
pub use extension::{ExtensionCatalog, ExtensionEntry, ExtensionFactory};
pub use loader::PluggableLoader;
pub use mapping::DeviceMappingManager;
pub use registry::{PluginMap, ResourcePluginRegistry};
