//! Character classification and scanning of CSS source into a flat token
//! table with cursor-style navigation.

mod classes;
mod cursor;
mod kind;
mod lexer;
mod lines;

pub use classes::{CharClass, classify};
pub use kind::TokenKind;
pub use lines::{LineTable, Location};
use text_size::{TextRange, TextSize};

use crate::lexer::Lexer;

const BYTE_ORDER_MARK: &str = "\u{feff}";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

impl Token {
    pub fn start(self) -> TextSize {
        self.range.start()
    }

    pub fn end(self) -> TextSize {
        self.range.end()
    }
}

/// Non-standard input the scanner tolerates instead of rejecting.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExtensionKind {
    UnterminatedString,
    UnterminatedComment,
    /// A `//` line outside of any block, kept as an `UNKNOWN` token.
    LineComment,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Extension {
    pub kind: ExtensionKind,
    pub offset: TextSize,
}

#[derive(Clone, Copy, Debug)]
pub struct ScanOptions {
    /// Start as if already inside a `{ }` block.
    pub block_mode: bool,
    pub line: u32,
    pub column: u32,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { block_mode: false, line: 1, column: 1 }
    }
}

pub struct Scanner<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    lines: LineTable,
    extensions: Vec<Extension>,
    position: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_options(text, ScanOptions::default())
    }

    pub fn with_options(text: &'a str, options: ScanOptions) -> Self {
        let origin = if text.starts_with(BYTE_ORDER_MARK) { BYTE_ORDER_MARK.len() } else { 0 };
        let lines = LineTable::new(text, origin, options.line, options.column);
        let (tokens, extensions) = Lexer::new(text, origin, options.block_mode).tokenize();

        Self { text, tokens, lines, extensions, position: 0 }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// The token under the cursor, `None` at end of input.
    pub fn current(&self) -> Option<Token> {
        self.tokens.get(self.position).copied()
    }

    pub fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|token| token.kind)
    }

    /// Index of the current token in the table.
    pub fn token_index(&self) -> usize {
        self.position
    }

    /// Advances and returns the new current token.
    pub fn next(&mut self) -> Option<Token> {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        self.current()
    }

    /// Peeks `k` tokens ahead without moving; `lookup(0)` is the current token.
    pub fn lookup(&self, k: usize) -> Option<Token> {
        self.tokens.get(self.position + k).copied()
    }

    pub fn lookup_type(&self, k: usize, kind: TokenKind) -> bool {
        self.lookup(k).is_some_and(|token| token.kind == kind)
    }

    pub fn token_text(&self, token: Token) -> &'a str {
        &self.text[token.range]
    }

    /// Case-insensitive comparison of a token's text with a lowercase reference.
    pub fn token_matches(&self, token: Token, reference: &str) -> bool {
        self.token_text(token).eq_ignore_ascii_case(reference)
    }

    pub fn slice(&self, start: TextSize, end: TextSize) -> &'a str {
        &self.text[TextRange::new(start, end)]
    }

    /// Offset of the current token, or the end of input.
    pub fn offset(&self) -> TextSize {
        match self.current() {
            Some(token) => token.start(),
            None => TextSize::of(self.text),
        }
    }

    pub fn location(&self, offset: TextSize) -> Location {
        self.lines.location(offset)
    }

    /// Location right after the last non-whitespace character before the
    /// cursor, used to report errors at end of input.
    pub fn last_non_space_location(&self) -> Location {
        let end = usize::from(self.offset());
        let trimmed = self.text[..end].trim_end_matches([' ', '\t', '\n', '\r', '\u{c}']);
        self.location(TextSize::of(trimmed))
    }

    /// Moves the start of the current token forward to `at`, returning the
    /// text that was cut off. Used to separate an IE hack suffix (`px\9`) from
    /// a unit name; afterwards the current token only covers the suffix.
    pub fn detach_prefix(&mut self, at: TextSize) -> &'a str {
        let Some(token) = self.tokens.get_mut(self.position) else {
            return "";
        };

        if !token.range.contains(at) {
            return "";
        }

        let prefix = TextRange::new(token.range.start(), at);
        token.range = TextRange::new(at, token.range.end());
        &self.text[prefix]
    }
}

#[cfg(test)]
mod tests {
    use super::TokenKind::*;
    use super::*;

    fn kinds(text: &str) -> Vec<(TokenKind, &str)> {
        kinds_with(text, ScanOptions::default())
    }

    fn kinds_with(text: &str, options: ScanOptions) -> Vec<(TokenKind, &str)> {
        let mut scanner = Scanner::with_options(text, options);
        let mut out = Vec::new();
        while let Some(token) = scanner.current() {
            out.push((token.kind, scanner.token_text(token)));
            scanner.next();
        }
        out
    }

    #[test]
    fn ruleset_tokens() {
        assert_eq!(
            kinds(".a { color: red; }"),
            vec![
                (FULL_STOP, "."),
                (IDENT, "a"),
                (WHITESPACE, " "),
                (LEFT_BRACE, "{"),
                (WHITESPACE, " "),
                (IDENT, "color"),
                (COLON, ":"),
                (WHITESPACE, " "),
                (IDENT, "red"),
                (SEMICOLON, ";"),
                (WHITESPACE, " "),
                (RIGHT_BRACE, "}"),
            ]
        );
    }

    #[test]
    fn numbers_are_integer_runs() {
        assert_eq!(
            kinds("-1.5em"),
            vec![(HYPHEN_MINUS, "-"), (NUMBER, "1"), (FULL_STOP, "."), (NUMBER, "5"), (IDENT, "em")]
        );
    }

    #[test]
    fn identifiers_stop_at_hyphens_but_not_underscores() {
        assert_eq!(
            kinds("-moz-box_x"),
            vec![(HYPHEN_MINUS, "-"), (IDENT, "moz"), (HYPHEN_MINUS, "-"), (IDENT, "box_x")]
        );
    }

    #[test]
    fn strings_with_escapes() {
        assert_eq!(
            kinds(r#""a\"b" 'c'"#),
            vec![(STRING, r#""a\"b""#), (WHITESPACE, " "), (STRING, "'c'")]
        );
        assert_eq!(kinds("\"foo\\\nbar\""), vec![(STRING, "\"foo\\\nbar\"")]);
    }

    #[test]
    fn unterminated_string_runs_to_end() {
        let scanner = Scanner::new("'abc;}");
        assert_eq!(scanner.token_count(), 1);
        assert_eq!(
            scanner.extensions(),
            &[Extension { kind: ExtensionKind::UnterminatedString, offset: 0.into() }]
        );
    }

    #[test]
    fn comments() {
        assert_eq!(
            kinds("a/* x */b/**/"),
            vec![(IDENT, "a"), (COMMENT, "/* x */"), (IDENT, "b"), (COMMENT, "/**/")]
        );

        let scanner = Scanner::new("/* open");
        assert_eq!(scanner.token_count(), 1);
        assert_eq!(scanner.extensions()[0].kind, ExtensionKind::UnterminatedComment);
    }

    #[test]
    fn escapes_in_identifiers() {
        assert_eq!(kinds(r"a\:b"), vec![(IDENT, r"a\:b")]);
        assert_eq!(kinds("\\31 0"), vec![(IDENT, "\\31 0")]);
        assert_eq!(kinds("\\31  x"), vec![(IDENT, "\\31 "), (WHITESPACE, " "), (IDENT, "x")]);
        assert_eq!(kinds("\\1234567"), vec![(IDENT, "\\1234567")]);
        assert_eq!(kinds("px\\9;"), vec![(IDENT, "px\\9"), (SEMICOLON, ";")]);
    }

    #[test]
    fn double_slash_outside_blocks_is_unknown() {
        assert_eq!(
            kinds("// note\na{}"),
            vec![
                (UNKNOWN, "// note"),
                (WHITESPACE, "\n"),
                (IDENT, "a"),
                (LEFT_BRACE, "{"),
                (RIGHT_BRACE, "}"),
            ]
        );
    }

    #[test]
    fn double_slash_inside_blocks_is_identifier() {
        assert_eq!(
            kinds("{a://b}"),
            vec![
                (LEFT_BRACE, "{"),
                (IDENT, "a"),
                (COLON, ":"),
                (IDENT, "//b"),
                (RIGHT_BRACE, "}"),
            ]
        );

        let options = ScanOptions { block_mode: true, ..ScanOptions::default() };
        assert_eq!(kinds_with("x//y", options), vec![(IDENT, "x"), (IDENT, "//y")]);
    }

    #[test]
    fn url_mode_keeps_slashes() {
        assert_eq!(
            kinds("url(//x)"),
            vec![
                (IDENT, "url"),
                (LEFT_PAREN, "("),
                (SOLIDUS, "/"),
                (SOLIDUS, "/"),
                (IDENT, "x"),
                (RIGHT_PAREN, ")"),
            ]
        );
    }

    #[test]
    fn tokens_are_contiguous() {
        let text = "@media screen{a>b+c~d[e|=\"f\"]{g:h(1,2)!important}}";
        let scanner = Scanner::new(text);
        let mut expected_start = TextSize::new(0);
        let mut probe = Scanner::new(text);

        for _ in 0..scanner.token_count() {
            let token = probe.current().unwrap();
            assert_eq!(token.start(), expected_start);
            expected_start = token.end();
            probe.next();
        }

        assert_eq!(expected_start, TextSize::of(text));
    }

    #[test]
    fn navigation() {
        let mut scanner = Scanner::new("a b");

        assert!(scanner.lookup_type(0, IDENT));
        assert!(scanner.lookup_type(1, WHITESPACE));
        assert!(scanner.lookup_type(2, IDENT));
        assert_eq!(scanner.lookup(3), None);

        assert_eq!(scanner.next().map(|t| t.kind), Some(WHITESPACE));
        assert_eq!(scanner.next().map(|t| t.kind), Some(IDENT));
        assert_eq!(scanner.next(), None);
        assert!(scanner.is_eof());
        assert_eq!(scanner.next(), None);
    }

    #[test]
    fn byte_order_mark_is_skipped() {
        let scanner = Scanner::new("\u{feff}a");
        let token = scanner.current().unwrap();

        assert_eq!(token.kind, IDENT);
        assert_eq!(token.start(), TextSize::new(3));
        assert_eq!(scanner.location(token.start()).column, 1);
    }

    #[test]
    fn last_non_space_location_at_end() {
        let mut scanner = Scanner::new("a {\n  ");
        while scanner.next().is_some() {}

        let location = scanner.last_non_space_location();
        assert_eq!((location.offset, location.line, location.column), (3, 1, 4));
    }

    #[test]
    fn detach_prefix_shrinks_current_token() {
        let mut scanner = Scanner::new("px\\9");
        let at = TextSize::new(2);

        assert_eq!(scanner.detach_prefix(at), "px");
        let token = scanner.current().unwrap();
        assert_eq!(scanner.token_text(token), "\\9");
        assert_eq!(token.kind, IDENT);
    }
}
