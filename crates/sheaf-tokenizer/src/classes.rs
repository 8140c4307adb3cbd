/// Coarse category of a source byte.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CharClass {
    Whitespace,
    Identifier,
    Number,
    String,
    Punctuator,
}

const PUNCTUATORS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[]^{|}~";

const TABLE_LEN: usize = b'~' as usize + 1;

static CLASSES: [CharClass; TABLE_LEN] = build_table();

const fn build_table() -> [CharClass; TABLE_LEN] {
    let mut table = [CharClass::Identifier; TABLE_LEN];

    let mut i = 0;
    while i < PUNCTUATORS.len() {
        table[PUNCTUATORS[i] as usize] = CharClass::Punctuator;
        i += 1;
    }

    let mut digit = b'0';
    while digit <= b'9' {
        table[digit as usize] = CharClass::Number;
        digit += 1;
    }

    table[b' ' as usize] = CharClass::Whitespace;
    table[b'\t' as usize] = CharClass::Whitespace;
    table[b'\n' as usize] = CharClass::Whitespace;
    table[b'\r' as usize] = CharClass::Whitespace;
    table[0x0C] = CharClass::Whitespace;

    table[b'"' as usize] = CharClass::String;
    table[b'\'' as usize] = CharClass::String;

    table
}

/// Classifies a byte of UTF-8 source.
///
/// Bytes past the table (including every byte of a multi-byte sequence) are
/// identifier characters.
#[inline]
pub fn classify(byte: u8) -> CharClass {
    match CLASSES.get(byte as usize) {
        Some(&class) => class,
        None => CharClass::Identifier,
    }
}

/// Returns `true` when `byte` terminates an identifier run: any punctuator,
/// quote or whitespace.
#[inline]
pub(crate) fn ends_identifier(byte: u8) -> bool {
    !matches!(classify(byte), CharClass::Identifier | CharClass::Number)
}

#[inline]
pub(crate) fn is_whitespace(byte: u8) -> bool {
    classify(byte) == CharClass::Whitespace
}

#[inline]
pub(crate) fn is_newline(byte: u8) -> bool {
    matches!(byte, b'\n' | b'\r' | 0x0C)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_table() {
        assert_eq!(classify(b' '), CharClass::Whitespace);
        assert_eq!(classify(0x0C), CharClass::Whitespace);
        assert_eq!(classify(b'7'), CharClass::Number);
        assert_eq!(classify(b'"'), CharClass::String);
        assert_eq!(classify(b'\''), CharClass::String);
        assert_eq!(classify(b'{'), CharClass::Punctuator);
        assert_eq!(classify(b'~'), CharClass::Punctuator);
        assert_eq!(classify(b'_'), CharClass::Identifier);
        assert_eq!(classify(b'\\'), CharClass::Identifier);
        assert_eq!(classify(b'a'), CharClass::Identifier);
        assert_eq!(classify(0xC3), CharClass::Identifier);
    }

    #[test]
    fn identifier_terminators() {
        assert!(ends_identifier(b'-'));
        assert!(ends_identifier(b'"'));
        assert!(ends_identifier(b'\n'));
        assert!(!ends_identifier(b'9'));
        assert!(!ends_identifier(b'_'));
        assert!(!ends_identifier(0xE2));
    }
}
