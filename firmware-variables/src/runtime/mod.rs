// SPDX-License-Identifier: MIT OR Apache-2.0

//! Firmware variable stores.
//!
//! The boot functions never talk to firmware directly. They go through a
//! [`VariableStore`], which maps the runtime variable services (get, set,
//! delete, enumerate) onto whatever backs the variables:
//!
//! - [`MemoryStore`] keeps variables in memory.
//! - [`Efivarfs`] (feature `std`) uses the Linux `efivarfs` file system.
//!
//! Store failures are reported as the [`Status`] the firmware would have
//! returned, so callers can tell a missing variable ([`Status::NOT_FOUND`])
//! from a refused write ([`Status::ACCESS_DENIED`],
//! [`Status::WRITE_PROTECTED`]).

#[cfg(feature = "std")]
mod efivarfs;
mod memory;

#[cfg(feature = "std")]
pub use efivarfs::Efivarfs;
pub use memory::MemoryStore;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use firmware_variables_raw::variable::{VariableAttributes, VariableVendor};
use firmware_variables_raw::Status;

/// Access to firmware variables.
pub trait VariableStore {
    /// True if the host exposes UEFI variables at all.
    fn firmware_supported(&self) -> bool;

    /// Get the contents and attributes of a variable.
    ///
    /// Fails with [`Status::NOT_FOUND`] if the variable does not exist.
    fn read_variable(
        &self,
        name: &str,
        vendor: &VariableVendor,
    ) -> Result<(Vec<u8>, VariableAttributes), Status>;

    /// Set the value of a variable, creating it if needed.
    ///
    /// With [`VariableAttributes::APPEND_WRITE`], `data` is appended to the
    /// current value. Otherwise, empty `data` deletes the variable.
    fn write_variable(
        &mut self,
        name: &str,
        vendor: &VariableVendor,
        data: &[u8],
        attributes: VariableAttributes,
    ) -> Result<(), Status>;

    /// Delete a variable.
    ///
    /// Fails with [`Status::NOT_FOUND`] if the variable does not exist.
    fn delete_variable(&mut self, name: &str, vendor: &VariableVendor) -> Result<(), Status>;

    /// Get the names and vendor GUIDs of all currently-set variables.
    fn variable_keys(&self) -> Result<Vec<VariableKey>, Status>;
}

/// Unique key for a variable.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VariableKey {
    /// Unique identifier for the vendor.
    pub vendor: VariableVendor,
    /// Name of the variable.
    pub name: String,
}

impl VariableKey {
    /// Key for `name` in the `vendor` namespace.
    #[must_use]
    pub fn new(name: impl Into<String>, vendor: VariableVendor) -> Self {
        Self {
            vendor,
            name: name.into(),
        }
    }
}

impl fmt::Display for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "VariableKey {{ name: \"{}\", vendor: ", self.name)?;

        if self.vendor == VariableVendor::GLOBAL_VARIABLE {
            write!(f, "GLOBAL_VARIABLE")?;
        } else {
            write!(f, "{}", self.vendor.0)?;
        }

        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use firmware_variables_raw::guid;

    #[test]
    fn key_display() {
        let key = VariableKey::new("BootOrder", VariableVendor::GLOBAL_VARIABLE);
        assert_eq!(
            key.to_string(),
            "VariableKey { name: \"BootOrder\", vendor: GLOBAL_VARIABLE }"
        );

        let key = VariableKey::new(
            "Foo",
            VariableVendor(guid!("01234567-89ab-cdef-0123-456789abcdef")),
        );
        assert_eq!(
            key.to_string(),
            "VariableKey { name: \"Foo\", vendor: 01234567-89ab-cdef-0123-456789abcdef }"
        );
    }
}
