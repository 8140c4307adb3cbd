use text_size::{TextRange, TextSize};

use crate::classes::{CharClass, classify, ends_identifier, is_newline, is_whitespace};
use crate::cursor::Cursor;
use crate::{Extension, ExtensionKind, Token, TokenKind};

/// Single pass over the source producing the token table.
pub(crate) struct Lexer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
    extensions: Vec<Extension>,
    block_depth: u32,
    url_mode: bool,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(text: &'a str, origin: usize, block_mode: bool) -> Self {
        Self {
            text,
            cursor: Cursor::new(text, origin),
            tokens: Vec::with_capacity(estimate_token_count(text, origin)),
            extensions: Vec::new(),
            block_depth: u32::from(block_mode),
            url_mode: false,
        }
    }

    pub(crate) fn tokenize(mut self) -> (Vec<Token>, Vec<Extension>) {
        while let Some(byte) = self.cursor.peek() {
            let start = self.cursor.offset();

            let kind = match classify(byte) {
                CharClass::Whitespace => {
                    self.cursor.advance_while(is_whitespace);
                    TokenKind::WHITESPACE
                }
                CharClass::Number => {
                    self.cursor.advance_while(|b| b.is_ascii_digit());
                    TokenKind::NUMBER
                }
                CharClass::String => self.string(byte),
                CharClass::Punctuator => self.punctuator(byte),
                CharClass::Identifier => {
                    self.identifier();
                    TokenKind::IDENT
                }
            };

            self.tokens.push(Token { kind, range: TextRange::new(start, self.cursor.offset()) });
        }

        (self.tokens, self.extensions)
    }

    fn extension(&mut self, kind: ExtensionKind, offset: TextSize) {
        self.extensions.push(Extension { kind, offset });
    }

    fn string(&mut self, quote: u8) -> TokenKind {
        let start = self.cursor.offset();
        self.cursor.bump();

        loop {
            match self.cursor.bump() {
                Some(b'\\') => {
                    self.cursor.bump();
                }
                Some(byte) if byte == quote => break,
                Some(_) => {}
                None => {
                    self.extension(ExtensionKind::UnterminatedString, start);
                    break;
                }
            }
        }

        TokenKind::STRING
    }

    fn punctuator(&mut self, byte: u8) -> TokenKind {
        let start = self.cursor.offset();
        self.cursor.bump();

        match byte {
            b'/' if self.cursor.matches(b'*') => {
                self.cursor.bump();
                if !self.cursor.advance_past(b"*/") {
                    self.extension(ExtensionKind::UnterminatedComment, start);
                }
                return TokenKind::COMMENT;
            }
            b'/' if self.cursor.matches(b'/') && !self.url_mode => {
                if self.block_depth == 0 {
                    self.cursor.advance_while(|b| !is_newline(b));
                    self.extension(ExtensionKind::LineComment, start);
                    return TokenKind::UNKNOWN;
                }

                self.cursor.advance_while(|b| b == b'/');
                self.identifier();
                return TokenKind::IDENT;
            }
            b'{' => self.block_depth += 1,
            b'}' => self.block_depth = self.block_depth.saturating_sub(1),
            b'(' => {
                self.url_mode = self.tokens.last().is_some_and(|token| {
                    token.kind == TokenKind::IDENT
                        && self.text[token.range].eq_ignore_ascii_case("url")
                });
            }
            b')' => self.url_mode = false,
            _ => {}
        }

        TokenKind::from_punctuator(byte).unwrap_or(TokenKind::UNKNOWN)
    }

    fn identifier(&mut self) {
        while let Some(byte) = self.cursor.peek() {
            if byte == b'\\' {
                self.cursor.bump();
                self.escape();
            } else if ends_identifier(byte) {
                break;
            } else {
                self.cursor.bump();
            }
        }
    }

    /// Consumes the body of a `\` escape: either one literal character or up
    /// to six hex digits followed by at most one whitespace character.
    fn escape(&mut self) {
        let mut hex_len = 0;
        while hex_len < 6 && self.cursor.nth(hex_len).is_some_and(|b| b.is_ascii_hexdigit()) {
            hex_len += 1;
        }

        if hex_len == 0 {
            self.cursor.bump();
            return;
        }

        self.cursor.bump_n(hex_len);
        match self.cursor.peek() {
            Some(b'\r') if self.cursor.nth(1) == Some(b'\n') => self.cursor.bump_n(2),
            Some(byte) if is_whitespace(byte) => self.cursor.bump_n(1),
            _ => {}
        }
    }
}

/// Upper estimate of the token count: one per category change, plus one for
/// every punctuator and quote since those always stand alone.
fn estimate_token_count(text: &str, origin: usize) -> usize {
    let mut count = 1;
    let mut previous = None;

    for &byte in &text.as_bytes()[origin.min(text.len())..] {
        let class = classify(byte);
        if previous != Some(class) || matches!(class, CharClass::Punctuator | CharClass::String) {
            count += 1;
        }
        previous = Some(class);
    }

    count
}
