//! XOR checksums over framed sentences.
//!
//! A sentence carries `start body separator field`, where `field` is the XOR
//! of every body byte written in hex. Both entry points feed bytes through
//! [`verify`], which expects the start byte first, sums up to the separator,
//! then parses the field from whatever follows.

use core::fmt;

use log::debug;

use crate::buffer::SlidingBuffer;
use crate::codec::{circ_index, hex_value};
use crate::framing::Framing;
use crate::scan::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumError {
    MissingStart,
    MissingEnd,
    /// The field after the separator reads as a negative number.
    UnreadableField,
    /// Well formed, but the field disagrees with the body.
    Mismatch { calculated: u8, found: u32 },
    /// The descriptor outlived the buffer contents it pointed at.
    Stale,
}

impl ChecksumError {
    /// Whether the sentence itself was malformed, as opposed to parsed and
    /// wrong.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ChecksumError::MissingStart | ChecksumError::MissingEnd | ChecksumError::UnreadableField
        )
    }
}

impl fmt::Display for ChecksumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumError::MissingStart => write!(f, "malformed: no start marker"),
            ChecksumError::MissingEnd => write!(f, "malformed: no end marker"),
            ChecksumError::UnreadableField => write!(f, "malformed: unreadable checksum field"),
            ChecksumError::Mismatch { calculated, found } => write!(
                f,
                "checksum mismatch: calculated {calculated:02X}, found {found:02X}"
            ),
            ChecksumError::Stale => write!(f, "descriptor outlived its buffer contents"),
        }
    }
}

/// Verify the first sentence in `text` using NMEA framing.
///
/// `text` ends at its first NUL byte, if it has one. Bytes before the first
/// start marker are skipped. Returns the calculated checksum when it matches
/// the field.
pub fn checksum_of_text(text: &[u8]) -> Result<u8, ChecksumError> {
    checksum_of_text_with(text, &Framing::NMEA)
}

pub fn checksum_of_text_with(text: &[u8], framing: &Framing) -> Result<u8, ChecksumError> {
    let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
    let text = &text[..end];
    let start = text
        .iter()
        .position(|&b| b == framing.start)
        .ok_or(ChecksumError::MissingStart)?;
    verify(text[start..].iter().copied(), framing)
}

impl SlidingBuffer<'_> {
    /// Verify a scanned sentence where it sits, without copying it out.
    ///
    /// Positions are taken modulo the capacity, and the checksum field is only
    /// read from bytes inside the descriptor.
    pub fn checksum_of_message(&self, message: &Message) -> Result<u8, ChecksumError> {
        if !self.is_current(message) {
            return Err(ChecksumError::Stale);
        }
        let capacity = self.capacity();
        let bytes = (0..message.length).map(|i| self.buf[circ_index(message.start, i, capacity)]);
        verify(bytes, &self.framing)
    }
}

fn verify<I: Iterator<Item = u8>>(mut bytes: I, framing: &Framing) -> Result<u8, ChecksumError> {
    match bytes.next() {
        Some(b) if b == framing.start => {}
        _ => return Err(ChecksumError::MissingStart),
    }

    let mut calculated = 0u8;
    loop {
        match bytes.next() {
            Some(b) if b == framing.separator => break,
            Some(b) => calculated ^= b,
            None => return Err(ChecksumError::MissingEnd),
        }
    }

    let found = parse_field(bytes)?;
    if u32::from(calculated) != found {
        debug!("checksum mismatch: calculated {:02X}, found {:02X}", calculated, found);
        return Err(ChecksumError::Mismatch { calculated, found });
    }
    Ok(calculated)
}

/// Read a hex number the way `strtol(.., 16)` would: leading whitespace, an
/// optional sign, then digits up to the first non-digit. No digits reads as
/// 0 and an oversized value saturates, so both end up compared like any other
/// field. Only a negative value is unreadable.
fn parse_field<I: Iterator<Item = u8>>(bytes: I) -> Result<u32, ChecksumError> {
    let mut bytes = bytes.skip_while(u8::is_ascii_whitespace).peekable();

    let negative = match bytes.peek() {
        Some(&b'-') => {
            bytes.next();
            true
        }
        Some(&b'+') => {
            bytes.next();
            false
        }
        _ => false,
    };

    let value = bytes
        .map_while(hex_value)
        .fold(0u32, |acc, nibble| acc.saturating_mul(16).saturating_add(u32::from(nibble)));

    if negative && value != 0 {
        return Err(ChecksumError::UnreadableField);
    }
    Ok(value)
}
