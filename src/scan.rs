use log::trace;

use crate::buffer::{Phase, SlidingBuffer};

/// Location of a sentence inside a [`SlidingBuffer`], from its start byte up to
/// and including its terminator.
///
/// A descriptor doesn't own or borrow anything. It remembers which region it
/// was scanned from, and goes stale as soon as that buffer compacts or resets.
/// Operations given a stale or foreign descriptor refuse it instead of reading
/// unrelated bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    /// Base address of the region it was scanned from.
    pub(crate) origin: usize,
    pub(crate) start: usize,
    pub(crate) length: usize,
    pub(crate) epoch: u32,
}

impl Message {
    /// Offset of the start byte in the buffer.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl SlidingBuffer<'_> {
    /// Run the scanner over the bytes appended since the last call.
    ///
    /// Stops right after the first terminator that closes a sentence. The
    /// cursor keeps every byte examined, so nothing is scanned twice and a
    /// call with no new input finds nothing.
    pub fn scan(&mut self) -> Option<Message> {
        while self.cursor < self.len {
            let i = self.cursor;
            let b = self.buf[i];
            self.cursor += 1;

            match self.phase {
                Phase::Idle => {
                    if b == self.framing.start {
                        self.anchor = i;
                        self.phase = Phase::Pending;
                    }
                }
                Phase::Pending => {
                    if b == self.framing.terminator {
                        self.phase = Phase::Idle;
                        let message = Message {
                            origin: self.origin(),
                            start: self.anchor,
                            length: i - self.anchor + 1,
                            epoch: self.epoch,
                        };
                        trace!("sentence at {} ({} bytes)", message.start, message.length);
                        return Some(message);
                    }
                }
            }
        }
        None
    }

    /// Advance the scanner without keeping the descriptor.
    pub fn scan_skip(&mut self) -> bool {
        self.scan().is_some()
    }

    /// Whether `message` still addresses the bytes it was scanned from.
    pub(crate) fn is_current(&self, message: &Message) -> bool {
        message.origin == self.origin()
            && message.epoch == self.epoch
            && message.start + message.length <= self.len
    }

    fn origin(&self) -> usize {
        self.buf.as_ptr() as usize
    }
}
