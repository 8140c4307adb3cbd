use text_size::TextSize;

pub(crate) struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str, pos: usize) -> Self {
        Self { bytes: text.as_bytes(), pos }
    }

    pub(crate) fn offset(&self) -> TextSize {
        TextSize::new(self.pos as u32)
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    pub(crate) fn nth(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }

    pub(crate) fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    pub(crate) fn bump_n(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    pub(crate) fn matches(&self, byte: u8) -> bool {
        self.peek() == Some(byte)
    }

    pub(crate) fn advance_while(&mut self, f: impl Fn(u8) -> bool) {
        while let Some(byte) = self.peek() {
            if !f(byte) {
                break;
            }
            self.pos += 1;
        }
    }

    pub(crate) fn advance_to_end(&mut self) {
        self.pos = self.bytes.len();
    }

    /// Moves past the first occurrence of `needle`, returning `false` (and
    /// stopping at end of input) if there is none.
    pub(crate) fn advance_past(&mut self, needle: &[u8]) -> bool {
        match self.bytes[self.pos..].windows(needle.len()).position(|w| w == needle) {
            Some(index) => {
                self.pos += index + needle.len();
                true
            }
            None => {
                self.advance_to_end();
                false
            }
        }
    }
}
