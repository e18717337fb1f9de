// SPDX-License-Identifier: MIT OR Apache-2.0

//! `EFI_LOAD_OPTION` records, the payload of `Boot####` variables.
//!
//! Wire layout, all integers little-endian:
//!
//! ```text
//! attributes: u32
//! file_path_list_length: u16
//! description: UTF-16, NUL-terminated
//! file_path_list: [u8; file_path_list_length]
//! optional_data: remaining bytes
//! ```

pub use firmware_variables_raw::load_option::{
    LoadOptionAttributes, LoadOptionCategory, LOAD_OPTION_HEADER_SIZE,
};

use crate::device_path::DevicePathList;
use crate::result::{Error, LoadOptionErrorReason, Result};
use crate::strs;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

/// A decoded boot entry.
///
/// Decoding and re-encoding a valid record yields the original bytes. The
/// device path length field is not stored: [`encode`](Self::encode) always
/// derives it from `device_path`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct LoadOption {
    /// Attribute flags. Unknown bits are kept.
    pub attributes: LoadOptionAttributes,
    /// Human readable name shown by the boot manager.
    pub description: String,
    /// Where the loader lives.
    pub device_path: DevicePathList,
    /// Opaque data passed to the loader.
    pub optional_data: Vec<u8>,
}

impl LoadOption {
    /// Create an active boot option without optional data.
    #[must_use]
    pub fn new(description: impl Into<String>, device_path: DevicePathList) -> Self {
        Self {
            attributes: LoadOptionAttributes::ACTIVE,
            description: description.into(),
            device_path,
            optional_data: Vec::new(),
        }
    }

    /// Decode a load option.
    ///
    /// The description has no length field; it ends at the first NUL code
    /// unit. Any bytes after the device path are optional data.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedLoadOption`] if the buffer is shorter than the fixed
    /// header, if the description has no terminator or is not valid UTF-16,
    /// if fewer bytes remain than the device path length declares, or if the
    /// device path does not decode.
    pub fn decode(buffer: &[u8]) -> Result<Self> {
        let malformed = |reason, offset| Error::MalformedLoadOption { reason, offset };

        if buffer.len() < LOAD_OPTION_HEADER_SIZE {
            return Err(malformed(LoadOptionErrorReason::HeaderTooShort, 0));
        }
        let attributes = LoadOptionAttributes::from_bits_retain(u32::from_le_bytes([
            buffer[0], buffer[1], buffer[2], buffer[3],
        ]));
        let path_len = u16::from_le_bytes([buffer[4], buffer[5]]);

        let description_start = LOAD_OPTION_HEADER_SIZE;
        let description_bytes = &buffer[description_start..];
        let nul = strs::find_nul(description_bytes).ok_or(malformed(
            LoadOptionErrorReason::MissingTerminator,
            description_start,
        ))?;
        let description = strs::from_utf16le(&description_bytes[..nul]).ok_or(malformed(
            LoadOptionErrorReason::InvalidDescription,
            description_start,
        ))?;

        let path_start = description_start + nul + strs::CHAR16_SIZE;
        let path_end = path_start + usize::from(path_len);
        if path_end > buffer.len() {
            return Err(malformed(
                LoadOptionErrorReason::DevicePathTooShort {
                    expected: path_len,
                    available: buffer.len() - path_start,
                },
                path_start,
            ));
        }
        let device_path = DevicePathList::decode(&buffer[path_start..path_end]).map_err(|err| {
            malformed(LoadOptionErrorReason::DevicePath(Box::new(err)), path_start)
        })?;

        Ok(Self {
            attributes,
            description,
            device_path,
            optional_data: buffer[path_end..].to_vec(),
        })
    }

    /// Encode the load option, recomputing the device path length.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedLoadOption`] if the description contains a NUL
    /// character, or if the encoded device path is longer than `u16::MAX`
    /// bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.description.contains('\0') {
            return Err(Error::MalformedLoadOption {
                reason: LoadOptionErrorReason::InvalidDescription,
                offset: LOAD_OPTION_HEADER_SIZE,
            });
        }

        let path = self.device_path.encode();
        let path_len = u16::try_from(path.len()).map_err(|_| Error::MalformedLoadOption {
            reason: LoadOptionErrorReason::DevicePathTooLong { len: path.len() },
            offset: 4,
        })?;

        let mut out = Vec::with_capacity(
            LOAD_OPTION_HEADER_SIZE
                + (self.description.len() + 1) * strs::CHAR16_SIZE
                + path.len()
                + self.optional_data.len(),
        );
        out.extend_from_slice(&self.attributes.bits().to_le_bytes());
        out.extend_from_slice(&path_len.to_le_bytes());
        strs::push_utf16le_with_nul(&self.description, &mut out);
        out.extend_from_slice(&path);
        out.extend_from_slice(&self.optional_data);
        Ok(out)
    }

    /// True if the boot manager will try this option automatically.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.attributes.contains(LoadOptionAttributes::ACTIVE)
    }

    /// Category of the option.
    #[must_use]
    pub fn category(&self) -> LoadOptionCategory {
        self.attributes.category()
    }
}
