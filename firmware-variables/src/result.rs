// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error type shared by the codec and the boot variable functions.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt::{self, Display, Formatter};
use firmware_variables_raw::device_path::{DevicePathHeader, DeviceType};
use firmware_variables_raw::Status;

/// Return type of fallible operations in this crate.
pub type Result<Output = ()> = core::result::Result<Output, Error>;

/// Everything that can go wrong while decoding, encoding or storing boot
/// configuration.
///
/// Decoding errors carry the byte offset at which the problem was found.
/// Errors raised while handling a named variable are wrapped in
/// [`Error::Variable`] so the variable name travels with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A device path node header is structurally invalid: its declared
    /// length is smaller than the header, or it runs past the end of the
    /// buffer.
    MalformedHeader {
        /// Offset of the node header.
        offset: usize,
        /// Declared node length, if a complete header was available.
        length: Option<u16>,
        /// Bytes available from `offset` to the end of the buffer.
        available: usize,
    },
    /// A device path node uses a type that is not registered.
    UnknownType {
        /// Offset of the node header.
        offset: usize,
        /// Raw type value.
        device_type: u8,
    },
    /// A device path node uses a subtype that is not registered for its
    /// type.
    UnknownSubType {
        /// Offset of the node header.
        offset: usize,
        /// Type of the node.
        device_type: DeviceType,
        /// Raw subtype value.
        sub_type: u8,
    },
    /// A device path list ends in the middle of a node.
    TruncatedPath {
        /// Offset of the incomplete node.
        offset: usize,
        /// Bytes left in the buffer at `offset`.
        remaining: usize,
    },
    /// A load option is inconsistent with its own layout.
    MalformedLoadOption {
        /// What is wrong with it.
        reason: LoadOptionErrorReason,
        /// Offset at which the problem was found.
        offset: usize,
    },
    /// A device path node payload does not fit in the 16-bit length field.
    NodeTooBig {
        /// Size the node would have, header included.
        size: usize,
    },
    /// A fixed-width variable has the wrong size.
    MalformedVariable {
        /// Name of the variable.
        name: String,
        /// Size of the variable data in bytes.
        len: usize,
    },
    /// The host does not expose UEFI variables.
    UnsupportedFirmware,
    /// The variable store failed.
    Store {
        /// Name of the variable being accessed.
        name: String,
        /// Status reported by the store.
        status: Status,
    },
    /// A variable could not be decoded or encoded.
    Variable {
        /// Name of the variable.
        name: String,
        /// The underlying codec error.
        source: Box<Error>,
    },
}

impl Error {
    /// The status reported by the variable store, if this error came from it.
    #[must_use]
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Store { status, .. } => Some(*status),
            Self::Variable { source, .. } => source.status(),
            _ => None,
        }
    }

    /// True if the store reported that the variable does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(Status::NOT_FOUND)
    }

    pub(crate) fn in_variable(self, name: &str) -> Self {
        Self::Variable {
            name: name.into(),
            source: Box::new(self),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedHeader {
                offset,
                length: None,
                available,
            } => write!(
                f,
                "malformed device path node at offset {offset}: only {available} bytes left for the header"
            ),
            Self::MalformedHeader {
                offset,
                length: Some(length),
                available,
            } => {
                if usize::from(*length) < DevicePathHeader::SIZE {
                    write!(
                        f,
                        "malformed device path node at offset {offset}: length {length} is shorter than the header"
                    )
                } else {
                    write!(
                        f,
                        "malformed device path node at offset {offset}: length {length} exceeds the {available} bytes left"
                    )
                }
            }
            Self::UnknownType {
                offset,
                device_type,
            } => write!(
                f,
                "unknown device path type {device_type:#04x} at offset {offset}"
            ),
            Self::UnknownSubType {
                offset,
                device_type,
                sub_type,
            } => write!(
                f,
                "unknown subtype {sub_type:#04x} for device path type {device_type:?} at offset {offset}"
            ),
            Self::TruncatedPath { offset, remaining } => write!(
                f,
                "device path truncated at offset {offset}: {remaining} bytes do not form a complete node"
            ),
            Self::MalformedLoadOption { reason, offset } => {
                write!(f, "malformed load option at offset {offset}: {reason}")
            }
            Self::NodeTooBig { size } => write!(
                f,
                "device path node of {size} bytes does not fit in a 16-bit length"
            ),
            Self::MalformedVariable { name, len } => {
                write!(f, "variable {name} has an invalid size of {len} bytes")
            }
            Self::UnsupportedFirmware => write!(f, "the firmware does not expose UEFI variables"),
            Self::Store { name, status } => write!(f, "failed to access variable {name}: {status}"),
            Self::Variable { name, source } => write!(f, "variable {name}: {source}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Variable { source, .. } => Some(source.as_ref()),
            Self::MalformedLoadOption {
                reason: LoadOptionErrorReason::DevicePath(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Specifies what is wrong in an [`Error::MalformedLoadOption`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOptionErrorReason {
    /// The buffer is shorter than the attributes and length fields.
    HeaderTooShort,
    /// No NUL code unit terminates the description.
    MissingTerminator,
    /// The description is not valid UTF-16, or contains a NUL character.
    InvalidDescription,
    /// Fewer bytes remain than the device path length field declares.
    DevicePathTooShort {
        /// Declared device path length.
        expected: u16,
        /// Bytes actually available.
        available: usize,
    },
    /// The device path bytes do not decode.
    DevicePath(Box<Error>),
    /// The encoded device path does not fit in the 16-bit length field.
    DevicePathTooLong {
        /// Size of the encoded device path.
        len: usize,
    },
}

impl Display for LoadOptionErrorReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderTooShort => write!(f, "buffer is shorter than the fixed header"),
            Self::MissingTerminator => write!(f, "description has no NUL terminator"),
            Self::InvalidDescription => write!(f, "description is not a valid UTF-16 string"),
            Self::DevicePathTooShort {
                expected,
                available,
            } => write!(
                f,
                "device path length is {expected} bytes but only {available} bytes remain"
            ),
            Self::DevicePath(err) => write!(f, "invalid device path: {err}"),
            Self::DevicePathTooLong { len } => write!(
                f,
                "device path of {len} bytes does not fit in a 16-bit length"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn variable_context_is_kept() {
        let err = Error::TruncatedPath {
            offset: 12,
            remaining: 2,
        }
        .in_variable("Boot0001");
        assert_eq!(
            err.to_string(),
            "variable Boot0001: device path truncated at offset 12: 2 bytes do not form a complete node"
        );
        assert!(core::error::Error::source(&err).is_some());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn not_found_is_detected_through_context() {
        let err = Error::Store {
            name: "BootNext".into(),
            status: Status::NOT_FOUND,
        };
        assert!(err.is_not_found());
        assert!(err.clone().in_variable("BootNext").is_not_found());
        assert!(!Error::UnsupportedFirmware.is_not_found());
    }

    #[test]
    fn header_messages() {
        let short = Error::MalformedHeader {
            offset: 0,
            length: Some(2),
            available: 6,
        };
        assert!(short.to_string().contains("shorter than the header"));

        let overrun = Error::MalformedHeader {
            offset: 4,
            length: Some(40),
            available: 6,
        };
        assert!(overrun.to_string().contains("exceeds the 6 bytes left"));
    }
}
