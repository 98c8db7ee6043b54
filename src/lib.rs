#![no_std]

//! Reassembles NMEA-style sentences from a byte stream delivered in arbitrary
//! pieces, inside a fixed region of caller memory.
//!
//! ```
//! use nmea_stream::{SlidingBuffer, checksum_of_text};
//!
//! let mut region = [0u8; 64];
//! let mut nmea = SlidingBuffer::new(&mut region);
//! let mut line = [0u8; 64];
//!
//! for chunk in [&b"$GPGGA"[..], &b",1*4B\r\n$GP"[..]] {
//!     nmea.append(chunk).unwrap();
//!     while let Some(message) = nmea.scan() {
//!         let len = nmea.retire(&mut line, &message).unwrap();
//!         assert_eq!(checksum_of_text(&line[..len]), Ok(0x4b));
//!     }
//! }
//! ```

mod buffer;
mod checksum;
pub mod codec;
mod framing;
pub mod hex;
mod message;
mod scan;

pub use buffer::{AppendError, Phase, SlidingBuffer};
pub use checksum::{ChecksumError, checksum_of_text, checksum_of_text_with};
pub use framing::Framing;
pub use message::{PeekError, Sentence};
pub use scan::Message;
