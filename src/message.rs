use core::fmt;

use log::warn;

use crate::buffer::SlidingBuffer;
use crate::scan::Message;

/// Owned copy of a sentence.
pub type Sentence<const N: usize> = heapless::Vec<u8, N>;

/// Reasons a sentence could not be copied out of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeekError {
    DestinationTooSmall { expected: usize, found: usize },
    /// The buffer compacted or reset since the descriptor was scanned.
    Stale,
}

impl fmt::Display for PeekError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeekError::DestinationTooSmall { expected, found } => write!(
                f,
                "destination too small: sentence is {expected} bytes, room for {found}"
            ),
            PeekError::Stale => write!(f, "descriptor outlived its buffer contents"),
        }
    }
}

impl SlidingBuffer<'_> {
    /// Copy the sentence described by `message` into the front of `dest`.
    ///
    /// Nothing is copied unless the whole sentence fits. The buffer is not
    /// modified, so peeking twice gives the same bytes.
    pub fn peek(&self, dest: &mut [u8], message: &Message) -> Result<usize, PeekError> {
        if message.length > dest.len() {
            return Err(PeekError::DestinationTooSmall {
                expected: message.length,
                found: dest.len(),
            });
        }
        if !self.is_current(message) {
            return Err(PeekError::Stale);
        }

        let range = message.start..message.start + message.length;
        dest[..message.length].copy_from_slice(&self.buf[range]);
        Ok(message.length)
    }

    /// [`peek`](Self::peek) the sentence, then compact the buffer as though it
    /// had been consumed.
    ///
    /// The compaction happens whether or not the copy succeeded. If `dest` is
    /// too small, the sentence is gone.
    pub fn retire(&mut self, dest: &mut [u8], message: &Message) -> Result<usize, PeekError> {
        let copied = self.peek(dest, message);
        if let Err(e) = &copied {
            warn!("retiring sentence at {} without a copy: {}", message.start, e);
        }
        self.compact();
        copied
    }

    /// Scan for the next sentence and retire it into an owned buffer.
    ///
    /// `WouldBlock` means no complete sentence is buffered yet. A sentence
    /// longer than `N` is dropped and reported as
    /// [`PeekError::DestinationTooSmall`].
    pub fn recv<const N: usize>(&mut self) -> nb::Result<Sentence<N>, PeekError> {
        let Some(message) = self.scan() else {
            return Err(nb::Error::WouldBlock);
        };

        let mut scratch = [0u8; N];
        let len = self
            .retire(&mut scratch, &message)
            .map_err(nb::Error::Other)?;

        Sentence::from_slice(&scratch[..len]).map_err(|_| {
            nb::Error::Other(PeekError::DestinationTooSmall {
                expected: len,
                found: N,
            })
        })
    }
}
