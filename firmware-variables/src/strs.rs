// SPDX-License-Identifier: MIT OR Apache-2.0

//! UTF-16LE helpers for strings embedded in firmware variables.

use alloc::string::String;
use alloc::vec::Vec;
use firmware_variables_raw::Char16;

/// Size of one UTF-16 code unit on the wire.
pub(crate) const CHAR16_SIZE: usize = core::mem::size_of::<Char16>();

/// Decode UTF-16LE bytes. Returns `None` for an odd number of bytes or for
/// unpaired surrogates.
pub(crate) fn from_utf16le(bytes: &[u8]) -> Option<String> {
    if bytes.len() % CHAR16_SIZE != 0 {
        return None;
    }
    let units = bytes
        .chunks_exact(CHAR16_SIZE)
        .map(|unit| Char16::from_le_bytes([unit[0], unit[1]]));
    char::decode_utf16(units)
        .collect::<core::result::Result<String, _>>()
        .ok()
}

/// Decode UTF-16LE bytes, dropping a single trailing NUL if there is one.
pub(crate) fn from_utf16le_with_nul(bytes: &[u8]) -> Option<String> {
    let bytes = bytes.strip_suffix(&[0, 0]).unwrap_or(bytes);
    from_utf16le(bytes)
}

/// Append `s` as UTF-16LE followed by one NUL code unit.
pub(crate) fn push_utf16le_with_nul(s: &str, out: &mut Vec<u8>) {
    for unit in s.encode_utf16().chain(core::iter::once(0)) {
        out.extend_from_slice(&unit.to_le_bytes());
    }
}

/// Position of the first NUL code unit in `bytes`, counted in bytes.
pub(crate) fn find_nul(bytes: &[u8]) -> Option<usize> {
    bytes
        .chunks_exact(CHAR16_SIZE)
        .position(|unit| unit == [0, 0])
        .map(|index| index * CHAR16_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn strips_one_terminator() {
        assert_eq!(from_utf16le_with_nul(&[b'A', 0, 0, 0]).as_deref(), Some("A"));
        assert_eq!(
            from_utf16le_with_nul(&[b'A', 0, 0, 0, 0, 0]).as_deref(),
            Some("A\0")
        );
        assert_eq!(from_utf16le_with_nul(&[]).as_deref(), Some(""));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(from_utf16le(&[b'A', 0, b'B']), None);
        // Lone high surrogate.
        assert_eq!(from_utf16le(&[0x00, 0xd8]), None);
    }

    #[test]
    fn surrogate_pairs() {
        let mut out = Vec::new();
        push_utf16le_with_nul("\u{1F680}", &mut out);
        assert_eq!(out, vec![0x3d, 0xd8, 0x80, 0xde, 0, 0]);
        assert_eq!(from_utf16le_with_nul(&out).as_deref(), Some("\u{1F680}"));
    }

    #[test]
    fn nul_search_is_aligned() {
        // A zero byte pair straddling two code units is not a terminator.
        assert_eq!(find_nul(&[0x41, 0x00, 0x00, 0x42, 0x00, 0x00]), Some(4));
        assert_eq!(find_nul(&[0x41, 0x00, 0x00]), None);
    }
}
