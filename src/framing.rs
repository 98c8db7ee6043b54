/// The three bytes that delimit a sentence on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framing {
    /// First byte of every sentence.
    pub start: u8,
    /// Last byte of every sentence. Included in the sentence.
    pub terminator: u8,
    /// Introduces the trailing hex checksum field.
    pub separator: u8,
}

impl Framing {
    /// `$`, `\n`, `*`
    pub const NMEA: Framing = Framing {
        start: b'$',
        terminator: b'\n',
        separator: b'*',
    };
}

impl Default for Framing {
    fn default() -> Self {
        Framing::NMEA
    }
}
