// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the registry, the loader, and plugin implementations.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use nodeplug_config::NodePlugConfig;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Name of a schedulable resource type, e.g. `gpu` or a vendor-defined name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceName(pub String);

impl ResourceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ResourceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ResourceName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Resource types with a handler compiled into the node.
///
/// This is the fixed allow-list for the builtin registration path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum BuiltinResource {
    Gpu,
    Fpga,
}

impl BuiltinResource {
    /// The identifier used in configuration and in the registry mapping.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// What a dynamically loaded plugin returns when asked to describe itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Resource type name the plugin wants to serve.
    pub resource_name: String,
    /// Free-form plugin version reported by the vendor.
    #[serde(default)]
    pub plugin_version: Option<String>,
}

impl RegistrationRequest {
    pub fn new(resource_name: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            plugin_version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.plugin_version = Some(version.into());
        self
    }
}

/// A single device reported by a device plugin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device {
    /// Vendor-local device index.
    pub id: u32,
    /// Device node path, e.g. `/dev/fpga0`.
    pub dev_path: String,
    pub major_number: u32,
    pub minor_number: u32,
    /// PCI bus id, if the vendor reports one.
    #[serde(default)]
    pub bus_id: Option<String>,
    pub healthy: bool,
}

impl Device {
    pub fn new(id: u32, dev_path: impl Into<String>) -> Self {
        Self {
            id,
            dev_path: dev_path.into(),
            major_number: 0,
            minor_number: id,
            bus_id: None,
            healthy: true,
        }
    }
}

/// Ambient state handed to every plugin's `initialize`.
///
/// Cheap to clone; the configuration is shared.
#[derive(Debug, Clone)]
pub struct Context {
    conf: Arc<NodePlugConfig>,
}

impl Context {
    pub fn new(conf: NodePlugConfig) -> Self {
        Self {
            conf: Arc::new(conf),
        }
    }

    /// The node configuration this context was built from.
    pub fn conf(&self) -> &NodePlugConfig {
        &self.conf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn builtin_resource_names_are_lowercase() {
        let names: Vec<&str> = BuiltinResource::iter().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["gpu", "fpga"]);
        assert_eq!(BuiltinResource::Gpu.to_string(), "gpu");
    }

    #[test]
    fn builtin_resource_parse_rejects_unknown() {
        assert_eq!(BuiltinResource::from_str("fpga").unwrap(), BuiltinResource::Fpga);
        assert!(BuiltinResource::from_str("tpu").is_err());
        assert!(BuiltinResource::from_str("GPU").is_err());
    }

    #[test]
    fn resource_name_borrows_as_str() {
        let mut map = std::collections::HashMap::new();
        map.insert(ResourceName::from("gpu"), 1);
        assert_eq!(map.get("gpu"), Some(&1));
    }

    #[test]
    fn registration_request_serialization() {
        let req = RegistrationRequest::new("fpga-vendor-x").with_version("1.2.0");
        let json = serde_json::to_string(&req).expect("should serialize");
        let parsed: RegistrationRequest = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(req, parsed);
    }
}
