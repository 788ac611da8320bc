// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the nodeplug registry.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level nodeplug configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NodePlugConfig {
    /// Node-level settings.
    #[serde(default)]
    pub node: NodeConfig,

    /// Builtin resource plugins to activate.
    #[serde(default)]
    pub plugins: PluginsConfig,

    /// Pluggable device framework settings.
    #[serde(default)]
    pub device_framework: DeviceFrameworkConfig,

    /// The resource-type catalog, keyed by resource type name.
    #[serde(default)]
    pub resource_types: BTreeMap<String, ResourceTypeConfig>,
}

/// Node-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Builtin resource plugin selection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    /// Builtin resource plugin names, e.g. `["gpu", "fpga"]` or `"gpu,fpga"`.
    #[serde(default, deserialize_with = "comma_list")]
    pub builtin: Vec<String>,
}

/// Pluggable device framework configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceFrameworkConfig {
    /// Whether vendor device plugins are loaded at all.
    #[serde(default)]
    pub enabled: bool,

    /// Fully-qualified extension type names to load, in registration order.
    /// `None` means the key was never set.
    #[serde(
        default,
        deserialize_with = "optional_comma_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub device_classes: Option<Vec<String>>,

    /// Upper bound on a plugin's self-description call. `0` waits forever.
    #[serde(default = "default_registration_timeout_secs")]
    pub registration_timeout_secs: u64,
}

impl Default for DeviceFrameworkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            device_classes: None,
            registration_timeout_secs: default_registration_timeout_secs(),
        }
    }
}

fn default_registration_timeout_secs() -> u64 {
    30
}

/// One entry of the resource-type catalog.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceTypeConfig {
    /// Unit suffix, empty for countable resources.
    #[serde(default)]
    pub units: String,

    #[serde(default)]
    pub minimum_allocation: i64,

    #[serde(default = "default_maximum_allocation")]
    pub maximum_allocation: i64,
}

impl Default for ResourceTypeConfig {
    fn default() -> Self {
        Self {
            units: String::new(),
            minimum_allocation: 0,
            maximum_allocation: default_maximum_allocation(),
        }
    }
}

fn default_maximum_allocation() -> i64 {
    i64::MAX
}

/// Split a comma-separated string into trimmed, non-empty entries.
pub fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

struct CommaListVisitor;

impl<'de> Visitor<'de> for CommaListVisitor {
    type Value = Vec<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of strings or a comma-separated string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(split_comma_list(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut out = Vec::new();
        while let Some(item) = seq.next_element::<String>()? {
            let item = item.trim();
            if !item.is_empty() {
                out.push(item.to_string());
            }
        }
        Ok(out)
    }
}

fn comma_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    deserializer.deserialize_any(CommaListVisitor)
}

fn optional_comma_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    comma_list(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_everything() {
        let config = NodePlugConfig::default();
        assert!(config.plugins.builtin.is_empty());
        assert!(!config.device_framework.enabled);
        assert!(config.device_framework.device_classes.is_none());
        assert_eq!(config.device_framework.registration_timeout_secs, 30);
        assert!(config.resource_types.is_empty());
        assert_eq!(config.node.log_level, "info");
    }

    #[test]
    fn builtin_accepts_comma_separated_string() {
        let config: NodePlugConfig = toml::from_str(
            r#"
[plugins]
builtin = " gpu , fpga,, "
"#,
        )
        .unwrap();
        assert_eq!(config.plugins.builtin, vec!["gpu", "fpga"]);
    }

    #[test]
    fn builtin_accepts_array_and_trims() {
        let config: NodePlugConfig = toml::from_str(
            r#"
[plugins]
builtin = [" gpu", "fpga ", ""]
"#,
        )
        .unwrap();
        assert_eq!(config.plugins.builtin, vec!["gpu", "fpga"]);
    }

    #[test]
    fn device_classes_absent_vs_empty() {
        let absent: NodePlugConfig = toml::from_str("[device_framework]\nenabled = true\n").unwrap();
        assert!(absent.device_framework.device_classes.is_none());

        let empty: NodePlugConfig =
            toml::from_str("[device_framework]\nenabled = true\ndevice_classes = []\n").unwrap();
        assert_eq!(empty.device_framework.device_classes, Some(vec![]));
    }

    #[test]
    fn resource_type_defaults() {
        let config: NodePlugConfig = toml::from_str(
            r#"
[resource_types.fpga-vendor-x]
units = ""
"#,
        )
        .unwrap();
        let rt = &config.resource_types["fpga-vendor-x"];
        assert_eq!(rt.minimum_allocation, 0);
        assert_eq!(rt.maximum_allocation, i64::MAX);
    }

    #[test]
    fn unknown_field_in_device_framework_rejected() {
        let result = toml::from_str::<NodePlugConfig>("[device_framework]\nenabeld = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn default_config_serializes_to_toml() {
        let rendered = toml::to_string(&NodePlugConfig::default()).unwrap();
        assert!(rendered.contains("[device_framework]"));
        assert!(!rendered.contains("device_classes"));
    }
}
