/// One decoded character and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecodedChar {
    pub ch: char,
    /// Index of the first UTF-16 unit
    pub start: usize,
    /// 1, or 2 for a surrogate pair
    pub len: usize,
}

impl DecodedChar {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// The unit whose annotation applies to this character: the trailing
    /// (low) unit of a surrogate pair, otherwise the only unit.
    pub fn annotated_unit(&self) -> usize {
        self.start + self.len - 1
    }
}

/// Decode UTF-16, turning each unpaired surrogate into its own U+FFFD.
pub(crate) fn decode(text: &[u16]) -> Vec<DecodedChar> {
    let mut chars = Vec::with_capacity(text.len());
    let mut start = 0;
    for decoded in char::decode_utf16(text.iter().copied()) {
        let (ch, len) = match decoded {
            Ok(ch) => (ch, ch.len_utf16()),
            Err(_) => (char::REPLACEMENT_CHARACTER, 1),
        };
        chars.push(DecodedChar { ch, start, len });
        start += len;
    }
    chars
}
