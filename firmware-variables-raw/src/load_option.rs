// SPDX-License-Identifier: MIT OR Apache-2.0

//! `EFI_LOAD_OPTION` attributes and fixed header layout.

use bitflags::bitflags;

bitflags! {
    /// Attributes of a load option (`Boot####`, `Driver####`, ...).
    ///
    /// Unknown bits are kept so that a decoded option re-encodes to the same
    /// bytes; construct with [`from_bits_retain`](Self::from_bits_retain).
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct LoadOptionAttributes: u32 {
        /// The boot manager will attempt to boot this option automatically.
        const ACTIVE = 0x0000_0001;

        /// All UEFI drivers are disconnected and reconnected after this
        /// driver option is loaded.
        const FORCE_RECONNECT = 0x0000_0002;

        /// The option is not shown in the boot manager menu.
        const HIDDEN = 0x0000_0008;

        /// Mask of the bits holding the [`LoadOptionCategory`].
        const CATEGORY = 0x0000_1F00;
    }
}

impl LoadOptionAttributes {
    /// The category encoded in the [`CATEGORY`](Self::CATEGORY) bits.
    #[must_use]
    pub const fn category(self) -> LoadOptionCategory {
        LoadOptionCategory(self.bits() & Self::CATEGORY.bits())
    }
}

newtype_enum! {
    /// Category of a load option, stored in the
    /// [`LoadOptionAttributes::CATEGORY`] bits.
    pub enum LoadOptionCategory: u32 => {
        /// A formal boot option, part of the normal boot processing.
        BOOT = 0x0000_0000,
        /// An application that is only launched from the boot menu or a hot
        /// key.
        APP = 0x0000_0100,
    }
}

/// Size of the fixed part of a load option: a `u32` attribute word followed by
/// the `u16` length of the device path list.
pub const LOAD_OPTION_HEADER_SIZE: usize = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_bits() {
        let attrs = LoadOptionAttributes::from_bits_retain(0x0000_0101);
        assert!(attrs.contains(LoadOptionAttributes::ACTIVE));
        assert_eq!(attrs.category(), LoadOptionCategory::APP);
        assert_eq!(LoadOptionAttributes::ACTIVE.category(), LoadOptionCategory::BOOT);
    }

    #[test]
    fn unknown_bits_are_retained() {
        let attrs = LoadOptionAttributes::from_bits_retain(0x8000_0001);
        assert_eq!(attrs.bits(), 0x8000_0001);
    }
}
