/// Token kinds produced by the scanner.
///
/// Single-character punctuators use their character code as discriminant, so a
/// byte can be turned into its kind without a lookup table.
#[allow(non_camel_case_types)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    WHITESPACE = 1,
    IDENT = 2,
    NUMBER = 3,
    STRING = 4,
    COMMENT = 5,
    UNKNOWN = 6,

    EXCLAMATION_MARK = b'!',
    QUOTATION_MARK = b'"',
    NUMBER_SIGN = b'#',
    DOLLAR_SIGN = b'$',
    PERCENT_SIGN = b'%',
    AMPERSAND = b'&',
    APOSTROPHE = b'\'',
    LEFT_PAREN = b'(',
    RIGHT_PAREN = b')',
    ASTERISK = b'*',
    PLUS = b'+',
    COMMA = b',',
    HYPHEN_MINUS = b'-',
    FULL_STOP = b'.',
    SOLIDUS = b'/',
    COLON = b':',
    SEMICOLON = b';',
    LESS_THAN = b'<',
    EQUALS = b'=',
    GREATER_THAN = b'>',
    QUESTION_MARK = b'?',
    COMMERCIAL_AT = b'@',
    LEFT_BRACKET = b'[',
    RIGHT_BRACKET = b']',
    CIRCUMFLEX = b'^',
    LOW_LINE = b'_',
    LEFT_BRACE = b'{',
    VERTICAL_LINE = b'|',
    RIGHT_BRACE = b'}',
    TILDE = b'~',
}

impl TokenKind {
    pub const fn from_punctuator(byte: u8) -> Option<Self> {
        use TokenKind::*;

        Some(match byte {
            b'!' => EXCLAMATION_MARK,
            b'"' => QUOTATION_MARK,
            b'#' => NUMBER_SIGN,
            b'$' => DOLLAR_SIGN,
            b'%' => PERCENT_SIGN,
            b'&' => AMPERSAND,
            b'\'' => APOSTROPHE,
            b'(' => LEFT_PAREN,
            b')' => RIGHT_PAREN,
            b'*' => ASTERISK,
            b'+' => PLUS,
            b',' => COMMA,
            b'-' => HYPHEN_MINUS,
            b'.' => FULL_STOP,
            b'/' => SOLIDUS,
            b':' => COLON,
            b';' => SEMICOLON,
            b'<' => LESS_THAN,
            b'=' => EQUALS,
            b'>' => GREATER_THAN,
            b'?' => QUESTION_MARK,
            b'@' => COMMERCIAL_AT,
            b'[' => LEFT_BRACKET,
            b']' => RIGHT_BRACKET,
            b'^' => CIRCUMFLEX,
            b'_' => LOW_LINE,
            b'{' => LEFT_BRACE,
            b'|' => VERTICAL_LINE,
            b'}' => RIGHT_BRACE,
            b'~' => TILDE,
            _ => return None,
        })
    }

    pub const fn is_punctuator(self) -> bool {
        self as u8 > Self::UNKNOWN as u8
    }

    /// Human readable name used in "... is expected" messages.
    pub const fn describe(self) -> &'static str {
        use TokenKind::*;

        match self {
            WHITESPACE => "Whitespace",
            IDENT => "Identifier",
            NUMBER => "Number",
            STRING => "String",
            COMMENT => "Comment",
            UNKNOWN => "Unknown",
            EXCLAMATION_MARK => "`!`",
            QUOTATION_MARK => "`\"`",
            NUMBER_SIGN => "`#`",
            DOLLAR_SIGN => "`$`",
            PERCENT_SIGN => "`%`",
            AMPERSAND => "`&`",
            APOSTROPHE => "`'`",
            LEFT_PAREN => "`(`",
            RIGHT_PAREN => "`)`",
            ASTERISK => "`*`",
            PLUS => "`+`",
            COMMA => "`,`",
            HYPHEN_MINUS => "`-`",
            FULL_STOP => "`.`",
            SOLIDUS => "`/`",
            COLON => "`:`",
            SEMICOLON => "`;`",
            LESS_THAN => "`<`",
            EQUALS => "`=`",
            GREATER_THAN => "`>`",
            QUESTION_MARK => "`?`",
            COMMERCIAL_AT => "`@`",
            LEFT_BRACKET => "`[`",
            RIGHT_BRACKET => "`]`",
            CIRCUMFLEX => "`^`",
            LOW_LINE => "`_`",
            LEFT_BRACE => "`{`",
            VERTICAL_LINE => "`|`",
            RIGHT_BRACE => "`}`",
            TILDE => "`~`",
        }
    }
}
