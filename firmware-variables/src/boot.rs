// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boot manager variables.
//!
//! The boot manager reads its configuration from variables in the
//! [`VariableVendor::GLOBAL_VARIABLE`] namespace:
//!
//! | Variable      | Contents                                          |
//! |---------------|---------------------------------------------------|
//! | `BootOrder`   | packed `i16` entry ids, tried in order            |
//! | `Boot####`    | a [`LoadOption`], `####` being the id in hex      |
//! | `BootNext`    | one `i16` id to boot once, ahead of `BootOrder`   |
//! | `BootCurrent` | the `i16` id the running system was booted from   |
//!
//! Every function here first checks [`VariableStore::firmware_supported`]
//! and fails with [`Error::UnsupportedFirmware`] without touching the store
//! if it returns `false`.
//!
//! Entry ids are signed 16-bit values, as on the wire. `Boot####` names use
//! their two's complement bit pattern, so id `-1` is `BootFFFF`.

use crate::load_option::LoadOption;
use crate::result::{Error, Result};
use crate::runtime::VariableStore;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use firmware_variables_raw::variable::{VariableAttributes, VariableVendor};
use firmware_variables_raw::Status;
use log::debug;

/// Attributes boot variables are written with.
pub const DEFAULT_ATTRIBUTES: VariableAttributes = VariableAttributes::BOOT_VARIABLE;

/// Name of the boot order variable.
pub const BOOT_ORDER: &str = "BootOrder";
/// Name of the one-shot boot override variable.
pub const BOOT_NEXT: &str = "BootNext";
/// Name of the variable holding the entry the system was booted from.
pub const BOOT_CURRENT: &str = "BootCurrent";

const VENDOR: &VariableVendor = &VariableVendor::GLOBAL_VARIABLE;

const ID_SIZE: usize = core::mem::size_of::<i16>();

/// Name of the `Boot####` variable for `id`.
///
/// ```
/// use firmware_variables::boot::boot_entry_name;
///
/// assert_eq!(boot_entry_name(3), "Boot0003");
/// assert_eq!(boot_entry_name(0x2a), "Boot002A");
/// assert_eq!(boot_entry_name(-1), "BootFFFF");
/// ```
#[must_use]
pub fn boot_entry_name(id: i16) -> String {
    format!("Boot{:04X}", id as u16)
}

/// Pack entry ids the way `BootOrder` stores them.
#[must_use]
pub fn encode_boot_order(ids: &[i16]) -> Vec<u8> {
    ids.iter().flat_map(|id| id.to_le_bytes()).collect()
}

/// Unpack a `BootOrder` payload. Returns `None` if its size is odd.
#[must_use]
pub fn decode_boot_order(data: &[u8]) -> Option<Vec<i16>> {
    if data.len() % ID_SIZE != 0 {
        return None;
    }
    Some(
        data.chunks_exact(ID_SIZE)
            .map(|id| i16::from_le_bytes([id[0], id[1]]))
            .collect(),
    )
}

/// Get the boot order.
///
/// Order and duplicates are kept exactly as stored.
pub fn boot_order<S: VariableStore + ?Sized>(store: &S) -> Result<Vec<i16>> {
    verify_firmware(store)?;
    let data = read(store, BOOT_ORDER)?;
    decode_boot_order(&data).ok_or(Error::MalformedVariable {
        name: BOOT_ORDER.into(),
        len: data.len(),
    })
}

/// Set the boot order.
///
/// Ids are written in the given order, without sorting or removing
/// duplicates. An empty list deletes `BootOrder`.
pub fn set_boot_order<S: VariableStore + ?Sized>(store: &mut S, ids: &[i16]) -> Result {
    verify_firmware(store)?;
    if ids.is_empty() {
        return delete_if_present(store, BOOT_ORDER);
    }
    write(store, BOOT_ORDER, &encode_boot_order(ids))
}

/// Get the raw contents of boot entry `id`.
pub fn boot_entry<S: VariableStore + ?Sized>(store: &S, id: i16) -> Result<Vec<u8>> {
    verify_firmware(store)?;
    read(store, &boot_entry_name(id))
}

/// Set the raw contents of boot entry `id`.
///
/// The bytes are written as they are; use [`set_parsed_boot_entry`] to write
/// a [`LoadOption`].
pub fn set_boot_entry<S: VariableStore + ?Sized>(store: &mut S, id: i16, data: &[u8]) -> Result {
    verify_firmware(store)?;
    write(store, &boot_entry_name(id), data)
}

/// Get boot entry `id` as a [`LoadOption`].
///
/// Decoding errors are wrapped in [`Error::Variable`] with the variable name.
pub fn parsed_boot_entry<S: VariableStore + ?Sized>(store: &S, id: i16) -> Result<LoadOption> {
    let name = boot_entry_name(id);
    let data = boot_entry(store, id)?;
    LoadOption::decode(&data).map_err(|err| err.in_variable(&name))
}

/// Encode `option` and store it as boot entry `id`.
pub fn set_parsed_boot_entry<S: VariableStore + ?Sized>(
    store: &mut S,
    id: i16,
    option: &LoadOption,
) -> Result {
    verify_firmware(store)?;
    let name = boot_entry_name(id);
    let data = option.encode().map_err(|err| err.in_variable(&name))?;
    write(store, &name, &data)
}

/// Delete boot entry `id`.
///
/// `BootOrder` is left alone; callers removing an entry for good should
/// drop its id from the boot order too.
pub fn delete_boot_entry<S: VariableStore + ?Sized>(store: &mut S, id: i16) -> Result {
    verify_firmware(store)?;
    let name = boot_entry_name(id);
    debug!("deleting {name}");
    store
        .delete_variable(&name, VENDOR)
        .map_err(|status| Error::Store { name, status })
}

/// Get the entry to boot once on the next boot.
///
/// Returns `None` if `BootNext` is not set. Any other store failure is
/// returned as an error.
pub fn boot_next<S: VariableStore + ?Sized>(store: &S) -> Result<Option<i16>> {
    verify_firmware(store)?;
    read_optional_id(store, BOOT_NEXT)
}

/// Boot entry `id` once on the next boot, ahead of the boot order.
pub fn set_boot_next<S: VariableStore + ?Sized>(store: &mut S, id: i16) -> Result {
    verify_firmware(store)?;
    write(store, BOOT_NEXT, &id.to_le_bytes())
}

/// Remove the one-shot boot override. Succeeds if it was not set.
pub fn clear_boot_next<S: VariableStore + ?Sized>(store: &mut S) -> Result {
    verify_firmware(store)?;
    delete_if_present(store, BOOT_NEXT)
}

/// Get the entry the running system was booted from, if the firmware
/// reports it.
pub fn boot_current<S: VariableStore + ?Sized>(store: &S) -> Result<Option<i16>> {
    verify_firmware(store)?;
    read_optional_id(store, BOOT_CURRENT)
}

fn verify_firmware<S: VariableStore + ?Sized>(store: &S) -> Result {
    if store.firmware_supported() {
        Ok(())
    } else {
        Err(Error::UnsupportedFirmware)
    }
}

fn read<S: VariableStore + ?Sized>(store: &S, name: &str) -> Result<Vec<u8>> {
    let (data, _) = store
        .read_variable(name, VENDOR)
        .map_err(|status| Error::Store {
            name: name.into(),
            status,
        })?;
    debug!("read {name}: {} bytes", data.len());
    Ok(data)
}

fn write<S: VariableStore + ?Sized>(store: &mut S, name: &str, data: &[u8]) -> Result {
    debug!("writing {name}: {} bytes", data.len());
    store
        .write_variable(name, VENDOR, data, DEFAULT_ATTRIBUTES)
        .map_err(|status| Error::Store {
            name: name.into(),
            status,
        })
}

fn delete_if_present<S: VariableStore + ?Sized>(store: &mut S, name: &str) -> Result {
    debug!("deleting {name}");
    match store.delete_variable(name, VENDOR) {
        Ok(()) => Ok(()),
        Err(Status::NOT_FOUND) => {
            debug!("{name} was not set");
            Ok(())
        }
        Err(status) => Err(Error::Store {
            name: name.into(),
            status,
        }),
    }
}

fn read_optional_id<S: VariableStore + ?Sized>(store: &S, name: &str) -> Result<Option<i16>> {
    let data = match read(store, name) {
        Ok(data) => data,
        Err(err) if err.is_not_found() => {
            debug!("{name} is not set");
            return Ok(None);
        }
        Err(err) => return Err(err),
    };
    match *data.as_slice() {
        [lo, hi] => Ok(Some(i16::from_le_bytes([lo, hi]))),
        _ => Err(Error::MalformedVariable {
            name: name.into(),
            len: data.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MemoryStore;
    use alloc::vec;

    #[test]
    fn boot_order_encoding() {
        let data = encode_boot_order(&[3, 0, 7, 3, -2]);
        assert_eq!(data, [3, 0, 0, 0, 7, 0, 3, 0, 0xfe, 0xff]);
        assert_eq!(decode_boot_order(&data), Some(vec![3, 0, 7, 3, -2]));
        assert_eq!(decode_boot_order(&[]), Some(vec![]));
        assert_eq!(decode_boot_order(&[1, 0, 2]), None);
    }

    #[test]
    fn entry_names() {
        assert_eq!(boot_entry_name(0), "Boot0000");
        assert_eq!(boot_entry_name(0x1abc), "Boot1ABC");
        assert_eq!(boot_entry_name(i16::MIN), "Boot8000");
    }

    #[test]
    fn odd_boot_order() {
        let mut store = MemoryStore::new();
        store
            .write_variable(BOOT_ORDER, VENDOR, &[1, 0, 2], DEFAULT_ATTRIBUTES)
            .unwrap();
        assert_eq!(
            boot_order(&store),
            Err(Error::MalformedVariable {
                name: BOOT_ORDER.into(),
                len: 3
            })
        );
    }

    #[test]
    fn boot_next_size_is_checked() {
        let mut store = MemoryStore::new();
        store
            .write_variable(BOOT_NEXT, VENDOR, &[1, 0, 0, 0], DEFAULT_ATTRIBUTES)
            .unwrap();
        assert_eq!(
            boot_next(&store),
            Err(Error::MalformedVariable {
                name: BOOT_NEXT.into(),
                len: 4
            })
        );
    }

    #[test]
    fn written_with_default_attributes() {
        let mut store = MemoryStore::new();
        set_boot_next(&mut store, 4).unwrap();
        let (data, attributes) = store.read_variable(BOOT_NEXT, VENDOR).unwrap();
        assert_eq!(data, [4, 0]);
        assert_eq!(attributes, DEFAULT_ATTRIBUTES);
    }
}
