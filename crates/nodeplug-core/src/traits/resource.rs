// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The registry's internal plugin contract.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Context;

/// A handler for one resource type, as stored in the registry mapping.
///
/// Builtin plugins implement this directly; dynamically loaded device plugins
/// are conformed to it by an adapter.
#[async_trait]
pub trait ResourcePlugin: Send + Sync + 'static {
    /// Short human-readable description used in logs and listings.
    fn describe(&self) -> String;

    /// Prepare the plugin for use. Called once during registry initialization.
    async fn initialize(&self, ctx: &Context) -> Result<()>;

    /// Release whatever `initialize` acquired.
    async fn cleanup(&self) -> Result<()>;
}
