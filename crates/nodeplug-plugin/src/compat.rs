// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural compatibility check for extensions loaded by type name.
//!
//! An extension ships a [`PluginDescriptor`] declaring which contract it
//! implements and the signature of every operation it provides. Before the
//! extension is instantiated, the descriptor is compared operation by
//! operation against the contract the registry expects. Matching is by name
//! first, then by parameter and return types.

use std::fmt;

use nodeplug_core::{NodePlugError, Result};
use tracing::{debug, error, info};

/// Shape of a single operation: name, parameter types, return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationSignature {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub returns: &'static str,
}

impl OperationSignature {
    pub const fn new(
        name: &'static str,
        params: &'static [&'static str],
        returns: &'static str,
    ) -> Self {
        Self {
            name,
            params,
            returns,
        }
    }
}

impl fmt::Display for OperationSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) -> {}", self.name, self.params.join(", "), self.returns)
    }
}

/// A named set of operations an implementation must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    pub name: &'static str,
    pub operations: &'static [OperationSignature],
}

/// The operations of [`nodeplug_core::DevicePlugin`], as extensions must declare them.
pub const DEVICE_PLUGIN_CONTRACT: Contract = Contract {
    name: "DevicePlugin",
    operations: &[
        OperationSignature::new("register_request", &[], "RegistrationRequest"),
        OperationSignature::new("devices", &[], "Vec<Device>"),
        OperationSignature::new("on_devices_allocated", &["&[Device]"], "()"),
        OperationSignature::new("on_devices_released", &["&[Device]"], "()"),
        OperationSignature::new("cleanup", &[], "()"),
    ],
};

/// What an extension declares about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    /// Fully-qualified type name the extension is registered under.
    pub type_name: String,
    /// Name of the contract the type claims to implement.
    pub contract: &'static str,
    /// Operations the type provides.
    pub operations: Vec<OperationSignature>,
}

impl PluginDescriptor {
    /// Descriptor for a type implementing every operation of `contract`.
    pub fn implementing(type_name: impl Into<String>, contract: &Contract) -> Self {
        Self {
            type_name: type_name.into(),
            contract: contract.name,
            operations: contract.operations.to_vec(),
        }
    }

    /// Descriptor for a complete [`nodeplug_core::DevicePlugin`] implementation.
    pub fn device_plugin(type_name: impl Into<String>) -> Self {
        Self::implementing(type_name, &DEVICE_PLUGIN_CONTRACT)
    }

    /// Drop an operation from the declaration.
    pub fn without_operation(mut self, name: &str) -> Self {
        self.operations.retain(|op| op.name != name);
        self
    }

    /// Add or replace an operation in the declaration.
    pub fn with_operation(mut self, op: OperationSignature) -> Self {
        self.operations.retain(|existing| existing.name != op.name);
        self.operations.push(op);
        self
    }
}

/// Verify that `candidate` provides every operation `expected` requires.
///
/// All problems are collected and reported together in one
/// [`NodePlugError::InterfaceMismatch`] naming the candidate type.
pub fn check_interface_compatibility(
    expected: &Contract,
    candidate: &PluginDescriptor,
) -> Result<()> {
    debug!(
        contract = expected.name,
        class = %candidate.type_name,
        "checking implemented interface compatibility"
    );

    if candidate.contract != expected.name {
        error!(
            class = %candidate.type_name,
            declared = candidate.contract,
            expected = expected.name,
            "extension implements a different contract"
        );
        return Err(NodePlugError::InterfaceMismatch {
            class_name: candidate.type_name.clone(),
            contract: expected.name.to_string(),
            missing: vec![format!("declares contract `{}`", candidate.contract)],
        });
    }

    let mut problems = Vec::new();
    for required in expected.operations {
        debug!(operation = required.name, "looking up operation");
        match candidate.operations.iter().find(|op| op.name == required.name) {
            None => {
                error!(
                    operation = required.name,
                    class = %candidate.type_name,
                    "operation is not implemented by plugin"
                );
                problems.push(format!("operation `{}` is not implemented", required.name));
            }
            Some(found) if found != required => {
                error!(
                    operation = required.name,
                    class = %candidate.type_name,
                    expected = %required,
                    found = %found,
                    "operation signature differs"
                );
                problems.push(format!(
                    "operation `{}` has signature `{found}`, expected `{required}`",
                    required.name
                ));
            }
            Some(_) => {
                debug!(operation = required.name, class = %candidate.type_name, "operation found");
            }
        }
    }

    if !problems.is_empty() {
        return Err(NodePlugError::InterfaceMismatch {
            class_name: candidate.type_name.clone(),
            contract: expected.name.to_string(),
            missing: problems,
        });
    }

    info!(contract = expected.name, class = %candidate.type_name, "interface compatibility is ok");
    Ok(())
}
