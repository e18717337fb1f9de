// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decoding and encoding of UEFI boot configuration.
//!
//! Firmware describes what to boot with a handful of variables in the global
//! variable namespace:
//!
//! - `BootOrder`: the list of boot entry ids to try, in order.
//! - `Boot####`: one [`LoadOption`] per entry, combining a description, a
//!   [`DevicePathList`] pointing at the loader, and opaque loader arguments.
//! - `BootNext`: a one-shot override of the boot order.
//!
//! This crate turns those bytes into structured values and back. Encoding is
//! exact: decoding a valid variable and encoding it again yields the same
//! bytes, and length fields are always recomputed from the data being
//! written.
//!
//! # Crate organisation
//!
//! - [`device_path`] decodes device path nodes and lists, with structured
//!   views of the hard drive and file path nodes boot entries rely on.
//! - [`load_option`] decodes and encodes `EFI_LOAD_OPTION` records.
//! - [`boot`] maps the boot manager variables onto a [`VariableStore`].
//! - [`runtime`] defines the [`VariableStore`] trait and the stores shipped
//!   with the crate.
//!
//! Wire-level tags and flags live in the [`firmware-variables-raw`] crate and
//! are re-exported here where they are part of the API.
//!
//! # Example
//!
//! ```
//! use firmware_variables::{boot, LoadOption, MemoryStore};
//! use firmware_variables::device_path::{DevicePathList, DevicePathNode};
//!
//! let mut store = MemoryStore::new();
//!
//! let path: DevicePathList = [
//!     DevicePathNode::file_path(r"\EFI\BOOT\BOOTX64.EFI")?,
//!     DevicePathNode::end_entire(),
//! ]
//! .into_iter()
//! .collect();
//!
//! boot::set_parsed_boot_entry(&mut store, 3, &LoadOption::new("Linux", path))?;
//! boot::set_boot_order(&mut store, &[3, 0])?;
//!
//! let entry = boot::parsed_boot_entry(&store, 3)?;
//! assert_eq!(entry.description, "Linux");
//! assert_eq!(entry.device_path.file_path().as_deref(), Some(r"\EFI\BOOT\BOOTX64.EFI"));
//! assert_eq!(boot::boot_next(&store)?, None);
//! # Ok::<(), firmware_variables::Error>(())
//! ```
//!
//! # Optional crate features
//!
//! - `std` (enabled by default): the [`Efivarfs`] store backed by the Linux
//!   `efivarfs` file system. Without it the crate is `no_std` and only needs
//!   `alloc`.
//!
//! [`firmware-variables-raw`]: firmware_variables_raw

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(clippy::all, clippy::must_use_candidate)]
#![warn(missing_docs, unused)]

extern crate alloc;

pub mod boot;
pub mod device_path;
pub mod load_option;
pub mod runtime;

mod result;
mod strs;

pub use self::device_path::{DevicePathList, DevicePathNode, HardDriveNode};
pub use self::load_option::LoadOption;
pub use self::result::{Error, LoadOptionErrorReason, Result};
#[cfg(feature = "std")]
pub use self::runtime::Efivarfs;
pub use self::runtime::{MemoryStore, VariableKey, VariableStore};

pub use firmware_variables_raw::variable::{VariableAttributes, VariableVendor};
pub use firmware_variables_raw::{guid, Guid, Status};
