// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the nodeplug resource plugin registry.
//!
//! This crate provides the error taxonomy, the shared data model, and the two
//! plugin traits every other crate in the workspace builds on.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BoxError, NodePlugError, Result};
pub use traits::{DevicePlugin, ResourcePlugin};
pub use types::{BuiltinResource, Context, Device, RegistrationRequest, ResourceName};
