// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin trait definitions.
//!
//! [`ResourcePlugin`] is what the registry stores and drives. [`DevicePlugin`]
//! is what vendor extensions implement; the registry wraps those in an adapter
//! to make them look like a `ResourcePlugin`.

pub mod device;
pub mod resource;

pub use device::DevicePlugin;
pub use resource::ResourcePlugin;
