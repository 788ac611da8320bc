// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for nodeplug integration tests.
//!
//! # Components
//!
//! - [`MockDevicePlugin`] - Vendor device plugin with injectable failures and delays
//! - [`CleanupJournal`] - Shared record of cleanup calls, in call order
//! - [`TestHarness`] - Builds a config, extension catalog, and resource-type catalog together

pub mod harness;
pub mod mock_device;

pub use harness::TestHarness;
pub use mock_device::{CleanupJournal, MockDevicePlugin};
