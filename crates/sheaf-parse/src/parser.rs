use std::sync::Arc;

use sheaf_ast::SourceInfo;
use sheaf_errors::SyntaxError;
use sheaf_tokenizer::{ExtensionKind, ScanOptions, Scanner, Token, TokenKind};
use text_size::TextSize;

use crate::ParseOptions;

pub(crate) type PResult<T> = Result<T, SyntaxError>;

/// State of one parse: the token cursor plus what every produced node needs
/// to record its position.
pub(crate) struct Parser<'a> {
    scanner: Scanner<'a>,
    positions: bool,
    filename: Arc<str>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str, options: &ParseOptions) -> Self {
        let scan = ScanOptions {
            block_mode: options.context.starts_in_block(),
            line: options.line,
            column: options.column,
        };

        Self {
            scanner: Scanner::with_options(text, scan),
            positions: options.positions,
            filename: options.filename.clone(),
        }
    }

    pub(crate) fn token_count(&self) -> usize {
        self.scanner.token_count()
    }

    pub(crate) fn report_extensions(&self) {
        for extension in self.scanner.extensions() {
            let location = self.scanner.location(extension.offset);
            let what = match extension.kind {
                ExtensionKind::UnterminatedString => "unterminated string",
                ExtensionKind::UnterminatedComment => "unterminated comment",
                ExtensionKind::LineComment => "`//` line outside of a block",
            };

            tracing::warn!(
                offset = location.offset,
                line = location.line,
                column = location.column,
                "{what} accepted as a non-standard extension"
            );
        }
    }

    pub(crate) fn current(&self) -> Option<Token> {
        self.scanner.current()
    }

    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.scanner.current_kind()
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.scanner.is_eof()
    }

    pub(crate) fn nth(&self, k: usize) -> Option<Token> {
        self.scanner.lookup(k)
    }

    pub(crate) fn nth_at(&self, k: usize, kind: TokenKind) -> bool {
        self.scanner.lookup_type(k, kind)
    }

    pub(crate) fn token_index(&self) -> usize {
        self.scanner.token_index()
    }

    pub(crate) fn advance(&mut self) {
        self.scanner.next();
    }

    pub(crate) fn text(&self, token: Token) -> &'a str {
        self.scanner.token_text(token)
    }

    /// Text of the current token, empty at end of input.
    pub(crate) fn current_text(&self) -> &'a str {
        self.current().map_or("", |token| self.text(token))
    }

    pub(crate) fn matches(&self, token: Token, reference: &str) -> bool {
        self.scanner.token_matches(token, reference)
    }

    pub(crate) fn slice(&self, start: TextSize, end: TextSize) -> &'a str {
        self.scanner.slice(start, end)
    }

    pub(crate) fn offset(&self) -> TextSize {
        self.scanner.offset()
    }

    pub(crate) fn byte_at(&self, offset: TextSize) -> Option<u8> {
        self.scanner.text().as_bytes().get(usize::from(offset)).copied()
    }

    pub(crate) fn detach_prefix(&mut self, at: TextSize) -> &'a str {
        self.scanner.detach_prefix(at)
    }

    /// Position of the current token, when positions are being recorded.
    pub(crate) fn info(&self) -> Option<SourceInfo> {
        if !self.positions {
            return None;
        }

        let token = self.current()?;
        let location = self.scanner.location(token.start());
        Some(SourceInfo {
            source: self.filename.clone(),
            offset: location.offset,
            line: location.line,
            column: location.column,
        })
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> SyntaxError {
        let location = match self.current() {
            Some(token) => self.scanner.location(token.start()),
            None => self.scanner.last_non_space_location(),
        };
        SyntaxError::new(message, location)
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<()> {
        if self.at(kind) {
            self.advance();
            return Ok(());
        }

        Err(self.error(format!("{} is expected", kind.describe())))
    }

    /// Checks for an identifier token spelled `name` (ASCII case-insensitive).
    pub(crate) fn expect_identifier(&mut self, name: &str, eat: bool) -> PResult<()> {
        match self.current() {
            Some(token) if token.kind == TokenKind::IDENT && self.matches(token, name) => {
                if eat {
                    self.advance();
                }
                Ok(())
            }
            _ => Err(self.error(format!("Identifier `{name}` is expected"))),
        }
    }

    /// Returns the current token if it is one of `kinds`, without consuming it.
    pub(crate) fn expect_any(&self, what: &str, kinds: &[TokenKind]) -> PResult<Token> {
        match self.current() {
            Some(token) if kinds.contains(&token.kind) => Ok(token),
            _ => Err(self.error(format!("{what} is expected"))),
        }
    }

    /// Skips whitespace and comments.
    pub(crate) fn skip_sc(&mut self) {
        while matches!(self.peek_kind(), Some(TokenKind::WHITESPACE | TokenKind::COMMENT)) {
            self.advance();
        }
    }
}
