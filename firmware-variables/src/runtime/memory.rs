// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{VariableKey, VariableStore};
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use firmware_variables_raw::variable::{VariableAttributes, VariableVendor};
use firmware_variables_raw::Status;

/// Variable store held in memory.
///
/// Behaves like firmware variable services for the operations boot
/// configuration needs: reads of absent variables and deletes of absent
/// variables fail with [`Status::NOT_FOUND`], empty writes delete, and
/// [`VariableAttributes::APPEND_WRITE`] appends (an empty append does
/// nothing). Useful to stage changes
/// before applying them and to exercise code without firmware.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    supported: bool,
    variables: BTreeMap<VariableKey, (Vec<u8>, VariableAttributes)>,
}

impl MemoryStore {
    /// Create an empty store on a host with UEFI variables.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            supported: true,
            variables: BTreeMap::new(),
        }
    }

    /// Create an empty store on a host without UEFI variables.
    ///
    /// [`firmware_supported`](VariableStore::firmware_supported) returns
    /// `false`; the other operations still work so tests can observe that
    /// nothing was touched.
    #[must_use]
    pub const fn unsupported() -> Self {
        Self {
            supported: false,
            variables: BTreeMap::new(),
        }
    }

    /// Number of variables in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// True if the store holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableStore for MemoryStore {
    fn firmware_supported(&self) -> bool {
        self.supported
    }

    fn read_variable(
        &self,
        name: &str,
        vendor: &VariableVendor,
    ) -> Result<(Vec<u8>, VariableAttributes), Status> {
        self.variables
            .get(&VariableKey::new(name, *vendor))
            .cloned()
            .ok_or(Status::NOT_FOUND)
    }

    fn write_variable(
        &mut self,
        name: &str,
        vendor: &VariableVendor,
        data: &[u8],
        attributes: VariableAttributes,
    ) -> Result<(), Status> {
        let key = VariableKey::new(name, *vendor);

        if attributes.contains(VariableAttributes::APPEND_WRITE) {
            if data.is_empty() {
                return Ok(());
            }
            let attributes = attributes.difference(VariableAttributes::APPEND_WRITE);
            let entry = self
                .variables
                .entry(key)
                .or_insert_with(|| (Vec::new(), attributes));
            if entry.1 != attributes {
                return Err(Status::INVALID_PARAMETER);
            }
            entry.0.extend_from_slice(data);
            return Ok(());
        }

        if data.is_empty() {
            return self.variables.remove(&key).map(drop).ok_or(Status::NOT_FOUND);
        }

        self.variables.insert(key, (data.to_vec(), attributes));
        Ok(())
    }

    fn delete_variable(&mut self, name: &str, vendor: &VariableVendor) -> Result<(), Status> {
        self.variables
            .remove(&VariableKey::new(name, *vendor))
            .map(drop)
            .ok_or(Status::NOT_FOUND)
    }

    fn variable_keys(&self) -> Result<Vec<VariableKey>, Status> {
        Ok(self.variables.keys().cloned().collect())
    }
}
