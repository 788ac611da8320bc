// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./nodeplug.toml` > `~/.config/nodeplug/nodeplug.toml` >
//! `/etc/nodeplug/nodeplug.toml` with environment variable overrides via `NODEPLUG_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::NodePlugConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/nodeplug/nodeplug.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "nodeplug.toml";

/// Top-level sections that environment variables can address.
///
/// Longest first so `device_framework_*` is not split on its inner underscore.
const ENV_SECTIONS: &[&str] = &["device_framework", "resource_types", "plugins", "node"];

/// Path of the per-user configuration file, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nodeplug").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/nodeplug/nodeplug.toml` (system-wide)
/// 3. `~/.config/nodeplug/nodeplug.toml` (user XDG config)
/// 4. `./nodeplug.toml` (local directory)
/// 5. `NODEPLUG_*` environment variables
pub fn load_config() -> Result<NodePlugConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<NodePlugConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NodePlugConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<NodePlugConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NodePlugConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the XDG lookup, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(NodePlugConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Map `NODEPLUG_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Figment hands over keys in their original case; field names are lowercase.
/// Uses an explicit section list rather than `Env::split("_")` because keys
/// like `device_classes` contain underscores themselves.
fn env_provider() -> Env {
    Env::prefixed("NODEPLUG_").map(|key| env_key_to_path(key.as_str()).into())
}

fn env_key_to_path(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(env_key_to_path("plugins_builtin"), "plugins.builtin");
        assert_eq!(
            env_key_to_path("device_framework_device_classes"),
            "device_framework.device_classes"
        );
        assert_eq!(env_key_to_path("device_framework_enabled"), "device_framework.enabled");
        assert_eq!(env_key_to_path("node_log_level"), "node.log_level");
        assert_eq!(env_key_to_path("unknown"), "unknown");
    }

    #[test]
    fn uppercase_env_keys_map_to_lowercase_fields() {
        assert_eq!(env_key_to_path("PLUGINS_BUILTIN"), "plugins.builtin");
        assert_eq!(
            env_key_to_path("DEVICE_FRAMEWORK_DEVICE_CLASSES"),
            "device_framework.device_classes"
        );
        assert_eq!(
            env_key_to_path("Device_Framework_Registration_Timeout_Secs"),
            "device_framework.registration_timeout_secs"
        );
    }
}
