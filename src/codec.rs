//! Nibble and index helpers shared by the hex codec and the checksum engine.

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Uppercase hex digit for the low nibble of `n`. The high nibble is ignored,
/// so `to_hex_digit(0x14) == b'4'`.
pub fn to_hex_digit(n: u8) -> u8 {
    HEX_DIGITS[(n & 0x0f) as usize]
}

/// Value of a hex digit in either case.
///
/// Anything that is not a hex digit decodes to `0`. Callers rely on this to
/// keep hex decoding total, so don't turn it into an error.
pub fn from_hex_digit(c: u8) -> u8 {
    hex_value(c).unwrap_or(0)
}

/// Strict variant used by checksum field parsing.
pub(crate) fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

/// `idx + inc` wrapped into `0..len`. `len` must be non-zero.
///
/// The sum itself wraps at `usize::MAX` before the modulo is taken.
pub fn circ_index(idx: usize, inc: usize, len: usize) -> usize {
    let i = idx.wrapping_add(inc);
    if i >= len { i % len } else { i }
}
