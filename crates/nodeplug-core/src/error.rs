// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the nodeplug resource plugin registry.

use thiserror::Error;

/// Boxed error returned by plugin code the registry does not own.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, NodePlugError>;

/// The primary error type for plugin discovery, registration, and lifecycle.
///
/// Every error raised while initializing the registry is fatal to that call:
/// the previously sealed mapping stays authoritative.
#[derive(Debug, Error)]
pub enum NodePlugError {
    /// A builtin plugin name is not in the supported allow-list.
    #[error("resource plugin `{name}` is not supported, supported plugins: {supported}")]
    UnsupportedResourceType { name: String, supported: String },

    /// A dynamically loaded plugin requested a name that is already registered.
    #[error(
        "resource type `{name}` already registered, change the resource type name \
         or configure the correct one for {class_name}"
    )]
    DuplicateResourceType { name: String, class_name: String },

    /// A dynamically loaded plugin requested a name missing from the resource-type catalog.
    #[error("resource type `{name}` requested by {class_name} is not configured in the resource-type catalog")]
    UnconfiguredResourceType { name: String, class_name: String },

    /// The extension type could not be resolved or instantiated.
    #[error("failed to load extension `{class_name}`: {reason}")]
    ClassLoadError {
        class_name: String,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The extension does not satisfy the device plugin contract.
    #[error("`{class_name}` does not implement {contract}: {}", .missing.join("; "))]
    InterfaceMismatch {
        class_name: String,
        contract: String,
        missing: Vec<String>,
    },

    /// The plugin's self-description call failed.
    #[error("plugin {class_name} failed to describe itself for registration: {message}")]
    PluginRegistrationError {
        class_name: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The adapter wrapping a dynamically loaded plugin failed to initialize.
    #[error("adapter of {class_name} for resource type `{name}` failed to initialize")]
    AdapterInitError {
        class_name: String,
        name: String,
        #[source]
        source: BoxError,
    },

    /// A code path that the allow-list check should make unreachable was reached.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    /// A registered plugin failed during cleanup.
    #[error("cleanup of resource plugin `{name}` failed")]
    PluginCleanupError {
        name: String,
        #[source]
        source: BoxError,
    },

    /// Configuration is unusable for the requested operation.
    #[error("configuration error: {0}")]
    Config(String),
}

impl NodePlugError {
    /// Build a class-load error without an underlying cause.
    pub fn class_load(class_name: impl Into<String>, reason: impl Into<String>) -> Self {
        NodePlugError::ClassLoadError {
            class_name: class_name.into(),
            reason: reason.into(),
            source: None,
        }
    }
}
