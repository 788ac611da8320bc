// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde attributes cannot express. Collects every failure
//! instead of stopping at the first one.

use crate::diagnostic::ConfigError;
use crate::model::NodePlugConfig;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &NodePlugConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.node.log_level.parse::<tracing::Level>() {
        errors.push(ConfigError::validation(format!(
            "node.log_level `{}` is not a log level: {e}",
            config.node.log_level
        )));
    }

    for (i, name) in config.plugins.builtin.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "plugins.builtin[{i}] must not be empty"
            )));
        }
    }

    let framework = &config.device_framework;
    match &framework.device_classes {
        None if framework.enabled => errors.push(ConfigError::validation(
            "device_framework.enabled is true but device_framework.device_classes is not set",
        )),
        Some(classes) => {
            for (i, class) in classes.iter().enumerate() {
                if class.trim().is_empty() {
                    errors.push(ConfigError::validation(format!(
                        "device_framework.device_classes[{i}] must not be empty"
                    )));
                }
            }
        }
        None => {}
    }

    for (name, rt) in &config.resource_types {
        if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
            errors.push(ConfigError::validation(format!(
                "resource type name `{name}` must be non-empty and contain no whitespace"
            )));
        }
        if rt.minimum_allocation < 0 {
            errors.push(ConfigError::validation(format!(
                "resource_types.{name}.minimum_allocation must be non-negative, got {}",
                rt.minimum_allocation
            )));
        }
        if rt.minimum_allocation > rt.maximum_allocation {
            errors.push(ConfigError::validation(format!(
                "resource_types.{name}: minimum_allocation {} exceeds maximum_allocation {}",
                rt.minimum_allocation, rt.maximum_allocation
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
