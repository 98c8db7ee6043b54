//! Binary to printable hex and back.
//!
//! The codec never fails. Output that does not fit is truncated, and input
//! bytes that are not hex digits decode as zero nibbles (see
//! [`from_hex_digit`]).

use crate::codec::{from_hex_digit, to_hex_digit};

/// Number of hex digits produced for `src_len` bytes into `max_len` bytes of
/// room. Odd room is rounded down so a byte is never half-written.
fn encoded_len(max_len: usize, src_len: usize) -> usize {
    src_len.saturating_mul(2).min(max_len & !1)
}

/// Encode `src` as uppercase hex into `dest`, high nibble first.
///
/// Returns the number of digits written, `min(2 * src.len(), dest.len())`
/// rounded down to even. Trailing source bytes that don't fit are dropped.
pub fn encode(dest: &mut [u8], src: &[u8]) -> usize {
    let len = encoded_len(dest.len(), src.len());
    for (i, b) in src[..len / 2].iter().enumerate().rev() {
        dest[2 * i] = to_hex_digit(b >> 4);
        dest[2 * i + 1] = to_hex_digit(*b);
    }
    len
}

/// Encode the first `src_len` bytes of `buf` over themselves.
///
/// Same output as [`encode`] with `buf` as the destination. Pairs are written
/// last to first, and pair `i` lands on `2i..2i + 2`, so every source byte is
/// read before anything overwrites it.
pub fn encode_in_place(buf: &mut [u8], src_len: usize) -> usize {
    let src_len = src_len.min(buf.len());
    let len = encoded_len(buf.len(), src_len);
    for i in (0..len / 2).rev() {
        let b = buf[i];
        buf[2 * i] = to_hex_digit(b >> 4);
        buf[2 * i + 1] = to_hex_digit(b);
    }
    len
}

/// Decode pairs of hex digits from `src` into `dest`.
///
/// Returns `min(src.len() / 2, dest.len())`. A dangling odd digit is ignored.
pub fn decode(dest: &mut [u8], src: &[u8]) -> usize {
    let len = (src.len() / 2).min(dest.len());
    for (out, pair) in dest[..len].iter_mut().zip(src.chunks_exact(2)) {
        *out = (from_hex_digit(pair[0]) << 4) | from_hex_digit(pair[1]);
    }
    len
}

/// Decode the hex digits held in `buf` into its front, writing at most
/// `max_len` bytes.
///
/// Output byte `i` comes from input `2i..2i + 2`, which a forward pass has not
/// touched yet.
pub fn decode_in_place(buf: &mut [u8], max_len: usize) -> usize {
    let len = (buf.len() / 2).min(max_len);
    for i in 0..len {
        let hi = from_hex_digit(buf[2 * i]);
        let lo = from_hex_digit(buf[2 * i + 1]);
        buf[i] = (hi << 4) | lo;
    }
    len
}
