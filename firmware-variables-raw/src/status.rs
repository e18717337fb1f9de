// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt::Debug;

newtype_enum! {
/// Status code reported by a firmware variable service.
///
/// These are the codes `GetVariable`, `SetVariable` and
/// `GetNextVariableName` are specified to return. Implementations may report
/// other values; those are carried through unchanged.
#[must_use]
pub enum Status: usize => {
    /// The operation completed successfully.
    SUCCESS                 =  0,

    /// A parameter was incorrect.
    INVALID_PARAMETER       = Self::ERROR_BIT |  2,
    /// The operation is not supported.
    UNSUPPORTED             = Self::ERROR_BIT |  3,
    /// The buffer is not large enough to hold the requested data.
    BUFFER_TOO_SMALL        = Self::ERROR_BIT |  5,
    /// The variable store reported a hardware error.
    DEVICE_ERROR            = Self::ERROR_BIT |  7,
    /// The variable is read-only or the store is write protected.
    WRITE_PROTECTED         = Self::ERROR_BIT |  8,
    /// There is not enough storage space left for the variable.
    OUT_OF_RESOURCES        = Self::ERROR_BIT |  9,
    /// The variable was not found.
    NOT_FOUND               = Self::ERROR_BIT | 14,
    /// Access to the variable was denied.
    ACCESS_DENIED           = Self::ERROR_BIT | 15,
    /// An authenticated variable failed its signature check.
    SECURITY_VIOLATION      = Self::ERROR_BIT | 26,
}}

impl Status {
    /// Bit indicating that a status code is an error.
    pub const ERROR_BIT: usize = 1 << (core::mem::size_of::<usize>() * 8 - 1);

    /// Returns true if status code indicates success.
    #[inline]
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// Returns true if status code indicates a warning.
    #[inline]
    #[must_use]
    pub fn is_warning(self) -> bool {
        (self != Self::SUCCESS) && (self.0 & Self::ERROR_BIT == 0)
    }

    /// Returns true if the status code indicates an error.
    #[inline]
    #[must_use]
    pub const fn is_error(self) -> bool {
        self.0 & Self::ERROR_BIT != 0
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn classification() {
        assert!(Status::SUCCESS.is_success());
        assert!(!Status::SUCCESS.is_error());
        assert!(Status::NOT_FOUND.is_error());
        assert!(!Status::NOT_FOUND.is_warning());
        assert!(Status(4).is_warning());
    }

    #[test]
    fn unknown_codes_keep_their_value() {
        assert_eq!(format!("{}", Status::ACCESS_DENIED), "ACCESS_DENIED");
        assert_eq!(format!("{:?}", Status(4)), "Status(4)");
    }
}
