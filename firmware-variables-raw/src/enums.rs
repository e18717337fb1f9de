// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tooling for the two kinds of enumerations found in firmware data.
//!
//! Some firmware values are *open*: the UEFI specification lists well-known
//! values, but anything else is still legal and must be carried through
//! unchanged (status codes, vendor GUIDs, partition formats). Those are
//! modeled as integer newtypes with associated constants by
//! [`newtype_enum!`].
//!
//! Other values are *closed*: an unregistered value means the data is
//! corrupt or uses an extension this crate does not understand, and it must
//! be rejected rather than coerced (device path types and subtypes). Those
//! are modeled as Rust enums by [`closed_enum!`], which only converts from
//! the raw value through a fallible constructor.

/// Interpret an integer newtype as an open, C-style enumeration.
///
/// ```
/// firmware_variables_raw::newtype_enum! {
///     /// Answer to a yes/no question.
///     pub enum Answer: u8 => {
///         /// No.
///         NO = 0,
///         /// Yes.
///         YES = 1,
///     }
/// }
///
/// assert_eq!(Answer(1), Answer::YES);
/// assert_eq!(format!("{:?}", Answer::NO), "NO");
/// assert_eq!(format!("{:?}", Answer(7)), "Answer(7)");
/// ```
#[macro_export]
macro_rules! newtype_enum {
    (
        $(#[$type_attrs:meta])*
        $visibility:vis enum $type:ident : $base:ty => $(#[$impl_attrs:meta])* {
            $(
                $(#[$variant_attrs:meta])*
                $variant:ident = $value:expr,
            )*
        }
    ) => {
        $(#[$type_attrs])*
        #[repr(transparent)]
        #[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
        $visibility struct $type(pub $base);

        $(#[$impl_attrs])*
        #[allow(unused)]
        impl $type {
            $(
                $(#[$variant_attrs])*
                pub const $variant: $type = $type($value);
            )*
        }

        impl core::fmt::Debug for $type {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                $(
                    if *self == $type::$variant {
                        return f.write_str(stringify!($variant));
                    }
                )*
                f.debug_tuple(stringify!($type)).field(&self.0).finish()
            }
        }
    };
}

/// Define a closed enumeration backed by an integer representation.
///
/// The generated type converts *into* its raw value infallibly, and *from*
/// a raw value only through `from_raw` or [`TryFrom`], which return the
/// unrecognized value on failure.
///
/// ```
/// firmware_variables_raw::closed_enum! {
///     /// A traffic light.
///     pub enum Light: u8 {
///         /// Stop.
///         Red = 1,
///         /// Go.
///         Green = 2,
///     }
/// }
///
/// assert_eq!(Light::from_raw(2), Some(Light::Green));
/// assert_eq!(Light::try_from(3), Err(3));
/// assert_eq!(u8::from(Light::Red), 1);
/// ```
#[macro_export]
macro_rules! closed_enum {
    (
        $(#[$type_attrs:meta])*
        $visibility:vis enum $type:ident : $repr:ident {
            $(
                $(#[$variant_attrs:meta])*
                $variant:ident = $value:expr,
            )*
        }
    ) => {
        $(#[$type_attrs])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr($repr)]
        $visibility enum $type {
            $(
                $(#[$variant_attrs])*
                $variant = $value,
            )*
        }

        impl $type {
            /// Every registered value, in declaration order.
            pub const ALL: &'static [$type] = &[$($type::$variant),*];

            /// Look up the variant registered for `value`.
            #[must_use]
            pub const fn from_raw(value: $repr) -> Option<Self> {
                match value {
                    $(v if v == $value => Some($type::$variant),)*
                    _ => None,
                }
            }

            /// The raw value of this variant.
            #[must_use]
            pub const fn raw(self) -> $repr {
                self as $repr
            }
        }

        impl TryFrom<$repr> for $type {
            type Error = $repr;

            fn try_from(value: $repr) -> core::result::Result<Self, Self::Error> {
                Self::from_raw(value).ok_or(value)
            }
        }

        impl From<$type> for $repr {
            fn from(value: $type) -> Self {
                value.raw()
            }
        }
    };
}
