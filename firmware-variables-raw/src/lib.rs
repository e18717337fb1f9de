// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw definitions for working with UEFI firmware variables.
//!
//! This crate holds the wire-level vocabulary shared by everything that reads
//! or writes boot configuration: device path node types, load option and
//! variable attribute flags, the global variable namespace and the status
//! codes returned by variable services. It has no behavior beyond converting
//! tags to and from their raw values.
//!
//! For decoding and encoding device paths and load options, use the
//! [`firmware-variables`] crate instead.
//!
//! [`firmware-variables`]: https://crates.io/crates/firmware-variables

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(clippy::all, clippy::must_use_candidate, clippy::use_self)]
#![warn(missing_debug_implementations, missing_docs, unused)]

#[cfg(test)]
extern crate alloc;

#[macro_use]
mod enums;

pub mod device_path;
pub mod load_option;
pub mod variable;

mod status;

pub use status::Status;
pub use uguid::{guid, Guid};

/// Two-byte character.
///
/// Strings stored in firmware variables are UTF-16 encoded and little-endian
/// on the wire.
pub type Char16 = u16;
