use core::fmt;

use log::{debug, trace};

use crate::framing::Framing;

/// Whether the scanner is inside a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No partial sentence. `anchor` is meaningless.
    Idle,
    /// A start byte was seen at `anchor` and the terminator hasn't arrived.
    Pending,
}

/// Reasons [`SlidingBuffer::append`] refused its input. The buffer is left
/// untouched in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendError {
    /// Nothing to append.
    Empty,
    /// Not enough room left, even after compaction.
    InsufficientCapacity { expected: usize, found: usize },
}

impl fmt::Display for AppendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppendError::Empty => write!(f, "nothing to append"),
            AppendError::InsufficientCapacity { expected, found } => write!(
                f,
                "insufficient capacity: needed {expected} bytes, {found} available"
            ),
        }
    }
}

impl embedded_io::Error for AppendError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            AppendError::Empty => embedded_io::ErrorKind::InvalidInput,
            AppendError::InsufficientCapacity { .. } => embedded_io::ErrorKind::OutOfMemory,
        }
    }
}

/// Fixed-capacity staging area for bytes coming off a talker.
///
/// Bytes are appended at the end and scanned front to back. Space is reclaimed
/// by compaction, which runs at the start of every [`append`](Self::append) and
/// after every [`retire`](Self::retire): it drops everything before the cursor
/// when idle, or everything before the partial sentence when one is pending.
///
/// Invariant: `anchor <= cursor <= len <= capacity`.
#[derive(Debug)]
pub struct SlidingBuffer<'a> {
    pub(crate) buf: &'a mut [u8],
    pub(crate) len: usize,
    pub(crate) cursor: usize,
    pub(crate) anchor: usize,
    pub(crate) phase: Phase,
    pub(crate) framing: Framing,
    /// Bumped whenever stored bytes move, to invalidate old descriptors.
    pub(crate) epoch: u32,
}

impl<'a> SlidingBuffer<'a> {
    /// Take over `region` as storage with NMEA framing. The region is zeroed.
    pub fn new(region: &'a mut [u8]) -> SlidingBuffer<'a> {
        SlidingBuffer::with_framing(region, Framing::NMEA)
    }

    pub fn with_framing(region: &'a mut [u8], framing: Framing) -> SlidingBuffer<'a> {
        let mut buffer = SlidingBuffer {
            buf: region,
            len: 0,
            cursor: 0,
            anchor: 0,
            phase: Phase::Idle,
            framing,
            epoch: 0,
        };
        buffer.reset();
        buffer
    }

    /// Zero the storage and forget all scan state.
    pub fn reset(&mut self) {
        self.buf.fill(0);
        self.len = 0;
        self.cursor = 0;
        self.anchor = 0;
        self.phase = Phase::Idle;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Copy `bytes` onto the end of the buffer.
    ///
    /// Compaction always runs first, even if the append is then refused. The
    /// append is all or nothing.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), AppendError> {
        self.compact();

        if bytes.is_empty() {
            return Err(AppendError::Empty);
        }

        let available = self.remaining();
        if bytes.len() > available {
            debug!(
                "append refused: {} bytes offered, {} available",
                bytes.len(),
                available
            );
            return Err(AppendError::InsufficientCapacity {
                expected: bytes.len(),
                found: available,
            });
        }

        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    /// Slide retained bytes down to the front of the storage.
    pub(crate) fn compact(&mut self) {
        let off = match self.phase {
            Phase::Idle => self.cursor,
            Phase::Pending => self.anchor,
        };
        if off == 0 {
            return;
        }

        trace!("compacting {} of {} bytes", off, self.len);
        self.buf.copy_within(off..self.len, 0);
        self.len -= off;
        self.cursor -= off;
        // Pending: the partial sentence now starts at 0. Idle: anchor is stale.
        self.anchor = 0;
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of valid bytes held.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Room left before compaction.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.len
    }

    /// Index of the next byte the scanner will look at.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Start of the pending sentence. Only meaningful in [`Phase::Pending`].
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn framing(&self) -> &Framing {
        &self.framing
    }

    /// The valid bytes, scanned or not.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Write a two-line picture of the buffer to `out`.
    ///
    /// The first line is the contents with unprintable bytes shown as `.`.
    /// The second marks the anchor with `S`, the cursor with `I`, and `X`
    /// where they coincide.
    pub fn dump<W: embedded_io::Write>(&self, out: &mut W) -> Result<(), W::Error> {
        for &b in self.as_slice() {
            let c = if b.is_ascii_graphic() || b == b' ' { b } else { b'.' };
            out.write_all(&[c])?;
        }
        out.write_all(b"\n")?;

        for i in 0..=self.len {
            let mark = match (i == self.anchor, i == self.cursor) {
                (true, true) => b'X',
                (true, false) => b'S',
                (false, true) => b'I',
                (false, false) => b' ',
            };
            out.write_all(&[mark])?;
        }
        out.write_all(b"\n")
    }
}

impl embedded_io::ErrorType for SlidingBuffer<'_> {
    type Error = AppendError;
}

/// Lets a transport push straight into the buffer. Writes are all or nothing.
impl embedded_io::Write for SlidingBuffer<'_> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use embedded_io::{ErrorType, Write};

    use super::*;

    #[derive(Debug)]
    struct TxBuffer(heapless::Vec<u8, 256>);

    impl TxBuffer {
        fn new() -> TxBuffer {
            TxBuffer(heapless::Vec::new())
        }
    }

    impl ErrorType for TxBuffer {
        type Error = Infallible;
    }

    impl Write for TxBuffer {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            let _ = self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn state(b: &SlidingBuffer) -> (usize, usize, usize, Phase) {
        (b.len(), b.cursor(), b.anchor(), b.phase())
    }

    #[test]
    fn construction_zeroes_region() {
        let mut mem = *b"ABCDEFGH";
        let b = SlidingBuffer::new(&mut mem);
        assert_eq!(b.capacity(), 8);
        assert!(b.is_empty());
        assert_eq!(state(&b), (0, 0, 0, Phase::Idle));
        drop(b);
        assert_eq!(mem, [0; 8]);
    }

    #[test]
    fn append_copies_to_end() {
        let mut mem = [0u8; 16];
        let mut b = SlidingBuffer::new(&mut mem);
        b.append(b"$GP").unwrap();
        b.append(b"GGA").unwrap();
        assert_eq!(b.as_slice(), b"$GPGGA");
        assert_eq!(b.remaining(), 10);
    }

    #[test]
    fn empty_append_is_refused() {
        let mut mem = [0u8; 16];
        let mut b = SlidingBuffer::new(&mut mem);
        assert_eq!(b.append(b""), Err(AppendError::Empty));
        assert!(b.is_empty());
    }

    #[test]
    fn oversize_append_is_refused_without_change() {
        let mut mem = [0u8; 24];
        let mut b = SlidingBuffer::new(&mut mem);
        let sentence = b"$CACYC,0,0,0,0,0,0*00\n\0\0\0";
        assert_eq!(
            b.append(&sentence[..25]),
            Err(AppendError::InsufficientCapacity { expected: 25, found: 24 })
        );
        assert_eq!(state(&b), (0, 0, 0, Phase::Idle));
        assert!(b.append(&sentence[..23]).is_ok());
        assert_eq!(b.len(), 23);
    }

    #[test]
    fn failed_append_keeps_contents() {
        let mut mem = [0u8; 8];
        let mut b = SlidingBuffer::new(&mut mem);
        b.append(b"$ABCDE").unwrap();
        assert!(b.scan().is_none());
        let before = state(&b);
        assert!(b.append(b"FGH").is_err());
        assert_eq!(state(&b), before);
        assert_eq!(b.as_slice(), b"$ABCDE");
    }

    #[test]
    fn fill_to_exact_capacity() {
        let mut mem = [0u8; 4];
        let mut b = SlidingBuffer::new(&mut mem);
        b.append(b"abcd").unwrap();
        assert_eq!(b.remaining(), 0);
        assert_eq!(
            b.append(b"e"),
            Err(AppendError::InsufficientCapacity { expected: 1, found: 0 })
        );
    }

    #[test]
    fn idle_compaction_drops_scanned_bytes() {
        let mut mem = [0u8; 8];
        let mut b = SlidingBuffer::new(&mut mem);
        b.append(b"junkjunk").unwrap();
        assert!(b.scan().is_none());
        assert_eq!(state(&b), (8, 8, 0, Phase::Idle));
        b.append(b"$A").unwrap();
        assert_eq!(b.as_slice(), b"$A");
        assert_eq!(state(&b), (2, 0, 0, Phase::Idle));
    }

    #[test]
    fn pending_compaction_keeps_partial_sentence() {
        let mut mem = [0u8; 12];
        let mut b = SlidingBuffer::new(&mut mem);
        b.append(b"xxxx$GPG").unwrap();
        assert!(b.scan().is_none());
        assert_eq!(state(&b), (8, 8, 4, Phase::Pending));
        b.append(b"GA,1*").unwrap();
        assert_eq!(b.as_slice(), b"$GPGGA,1*");
        assert_eq!(state(&b), (9, 4, 0, Phase::Pending));
    }

    #[test]
    fn reset_clears_everything() {
        let mut mem = [0u8; 8];
        let mut b = SlidingBuffer::new(&mut mem);
        b.append(b"ab$cd").unwrap();
        let _ = b.scan();
        b.reset();
        assert_eq!(state(&b), (0, 0, 0, Phase::Idle));
        assert_eq!(b.as_slice(), b"");
        drop(b);
        assert_eq!(mem, [0; 8]);
    }

    #[test]
    fn writes_through_embedded_io() {
        let mut mem = [0u8; 8];
        let mut b = SlidingBuffer::new(&mut mem);
        assert_eq!(Write::write(&mut b, b""), Ok(0));
        b.write_all(b"$AB").unwrap();
        assert_eq!(b.as_slice(), b"$AB");
        let err = Write::write(&mut b, b"123456").unwrap_err();
        assert_eq!(embedded_io::Error::kind(&err), embedded_io::ErrorKind::OutOfMemory);
    }

    #[test]
    fn dump_marks_anchor_and_cursor() {
        let mut mem = [0u8; 48];
        let mut b = SlidingBuffer::new(&mut mem);
        b.append(b"$CACYC,0,1,2").unwrap();
        let mut out = TxBuffer::new();
        b.dump(&mut out).unwrap();
        assert_eq!(out.0.as_slice(), b"$CACYC,0,1,2\nX            \n");

        assert!(b.scan().is_none());
        let mut out = TxBuffer::new();
        b.dump(&mut out).unwrap();
        assert_eq!(out.0.as_slice(), b"$CACYC,0,1,2\nS           I\n");
    }

    #[test]
    fn dump_hides_unprintable() {
        let mut mem = [0u8; 8];
        let mut b = SlidingBuffer::new(&mut mem);
        b.append(b"a\r\n\x01 b").unwrap();
        let mut out = TxBuffer::new();
        b.dump(&mut out).unwrap();
        assert_eq!(out.0.as_slice(), b"a... b\nX      \n");
    }
}
