use sheaf_ast::{List, Node, NodeKind};
use sheaf_tokenizer::{Token, TokenKind::*};
use text_size::TextSize;

use super::{Numeric, Scope, any, operator, read_ident, remove_trailing_spaces, space};
use crate::parser::{PResult, Parser};

/// A declaration value. Inside `var(..., <fallback>)` (`nested`) the value
/// ends at `)`, elsewhere at `;` or `}`.
pub(crate) fn value(p: &mut Parser<'_>, nested: bool) -> PResult<Node> {
    let info = p.info();
    let mut important = false;
    let mut sequence = List::new();

    p.skip_sc();

    while let Some(token) = p.current() {
        let child = match token.kind {
            RIGHT_BRACE | SEMICOLON => break,
            RIGHT_PAREN => {
                if !nested {
                    return Err(p.error("Unexpected input"));
                }
                break;
            }
            WHITESPACE => space(p),
            COMMENT => {
                p.advance();
                continue;
            }
            NUMBER_SIGN => hash(p)?,
            SOLIDUS | COMMA => operator(p),
            LEFT_PAREN | LEFT_BRACKET => braces(p, Scope::Value)?,
            EXCLAMATION_MARK => {
                important = important_flag(p)?;
                continue;
            }
            IDENT if p.matches(token, "u") && p.nth_at(1, PLUS) => unicode_range(p)?,
            _ => any(p, Scope::Value)?,
        };

        sequence.append(child);
    }

    remove_trailing_spaces(&mut sequence);
    Ok(Node::with_info(info, NodeKind::Value { important, sequence }))
}

/// `!` followed by `important`, with optional whitespace and comments between.
fn important_flag(p: &mut Parser<'_>) -> PResult<bool> {
    p.expect(EXCLAMATION_MARK)?;
    p.skip_sc();
    p.expect_identifier("important", false)?;
    read_ident(p, false)?;
    Ok(true)
}

/// `#` followed by a name or digits, as in `#fff` or `#3ee`.
pub(crate) fn hash(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    p.expect(NUMBER_SIGN)?;

    let first = p.expect_any("Number or identifier", &[NUMBER, IDENT])?;
    let mut end = first.end();

    if first.kind == NUMBER && p.nth_at(1, IDENT) {
        p.advance();
        end = p.current().map_or(end, Token::end);
    }
    p.advance();

    let value = p.slice(first.start(), end).to_owned();
    Ok(Node::with_info(info, NodeKind::Hash { value }))
}

/// `( ... )` or `[ ... ]` inside a value or at-rule expression.
pub(crate) fn braces(p: &mut Parser<'_>, scope: Scope) -> PResult<Node> {
    let info = p.info();
    let (open, close, close_kind) =
        if p.at(LEFT_PAREN) { ('(', ')', RIGHT_PAREN) } else { ('[', ']', RIGHT_BRACKET) };

    p.advance();
    p.skip_sc();

    let mut sequence = List::new();
    while let Some(kind) = p.peek_kind() {
        if kind == close_kind {
            break;
        }

        let child = match kind {
            WHITESPACE => space(p),
            COMMENT => {
                p.advance();
                continue;
            }
            NUMBER_SIGN => hash(p)?,
            LEFT_PAREN | LEFT_BRACKET => braces(p, scope)?,
            SOLIDUS | ASTERISK | COMMA | COLON => operator(p),
            _ => any(p, scope)?,
        };

        sequence.append(child);
    }

    remove_trailing_spaces(&mut sequence);
    p.expect(close_kind)?;

    Ok(Node::with_info(info, NodeKind::Braces { open, close, sequence }))
}

pub(crate) fn dimension(p: &mut Parser<'_>, number: Numeric) -> PResult<Node> {
    let unit = unit(p)?;
    Ok(Node::with_info(number.info, NodeKind::Dimension { value: number.value, unit }))
}

/// The unit of a dimension. An IE hack suffix glued to it (`1px\9`) is left
/// in the token stream to be read as its own identifier.
fn unit(p: &mut Parser<'_>) -> PResult<String> {
    let token = match p.current() {
        Some(token) if token.kind == IDENT => token,
        _ => return Err(p.error("Identifier is expected")),
    };

    let text = p.text(token);
    if let Some(index) = text.find('\\').filter(|&index| index > 0) {
        let at = token.start() + TextSize::new(index as u32);
        return Ok(p.detach_prefix(at).to_owned());
    }

    p.advance();
    Ok(text.to_owned())
}

/// `U+0025`, `U+0-7F`, `u+4??`. Read as a single Identifier.
fn unicode_range(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    let start = p.offset();

    p.advance();
    p.advance();
    let len = unicode_range_len(p, true)?;

    let name = p.slice(start, start + TextSize::new(2 + len)).to_owned();
    Ok(Node::with_info(info, NodeKind::Identifier { name }))
}

fn unicode_range_len(p: &mut Parser<'_>, wildcards_or_range: bool) -> PResult<u32> {
    let hex_start = p.offset();
    let mut len = 0;

    while let Some(token) = p.current() {
        if !matches!(token.kind, NUMBER | IDENT) {
            break;
        }
        len += u32::from(token.range.len());
        p.advance();
    }

    if len == 0 || len > 6 {
        return Err(p.error("Unexpected input"));
    }

    let digits = p.slice(hex_start, hex_start + TextSize::new(len));
    if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(p.error("Unexpected input"));
    }

    if !wildcards_or_range {
        return Ok(len);
    }

    let mut wildcards = false;
    while len < 6 && p.at(QUESTION_MARK) {
        len += 1;
        wildcards = true;
        p.advance();
    }

    if !wildcards && p.at(HYPHEN_MINUS) {
        p.advance();
        len += 1 + unicode_range_len(p, false)?;
    }

    Ok(len)
}

/// Value of a `filter` declaration made of `progid:...(...)` blocks.
pub(crate) fn filter_value(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    let mut sequence = List::new();

    while let Some(end) = progid_end(p) {
        sequence.append(progid(p, end)?);
    }

    p.skip_sc();
    let important = if p.at(EXCLAMATION_MARK) { important_flag(p)? } else { false };

    Ok(Node::with_info(info, NodeKind::Value { important, sequence }))
}

/// Looks ahead for `progid: DXImageTransform.Microsoft.name (...)`,
/// case-insensitively and allowing whitespace and comments between the parts.
/// Returns the token index of the balanced closing parenthesis.
pub(crate) fn progid_end(p: &Parser<'_>) -> Option<usize> {
    let skip_sc = |mut k: usize| {
        while p.nth(k).is_some_and(|token| matches!(token.kind, WHITESPACE | COMMENT)) {
            k += 1;
        }
        k
    };
    let word = |k: usize, word: &str| p.nth(k).is_some_and(|token| p.matches(token, word));

    let mut k = skip_sc(0);
    if !(word(k, "progid") && p.nth_at(k + 1, COLON)) {
        return None;
    }

    k = skip_sc(k + 2);
    if !(word(k, "dximagetransform")
        && p.nth_at(k + 1, FULL_STOP)
        && word(k + 2, "microsoft")
        && p.nth_at(k + 3, FULL_STOP)
        && p.nth_at(k + 4, IDENT))
    {
        return None;
    }

    k = skip_sc(k + 5);
    if !p.nth_at(k, LEFT_PAREN) {
        return None;
    }

    let mut depth = 0usize;
    while let Some(token) = p.nth(k) {
        match token.kind {
            LEFT_PAREN => depth += 1,
            RIGHT_PAREN => {
                depth -= 1;
                if depth == 0 {
                    return Some(p.token_index() + k);
                }
            }
            _ => {}
        }
        k += 1;
    }

    None
}

/// One `progid:...(...)` block captured as raw text, ending at the token with
/// index `end`.
fn progid(p: &mut Parser<'_>, end: usize) -> PResult<Node> {
    let info = p.info();
    p.skip_sc();

    let raw_info = p.info();
    let start = p.offset();
    while p.token_index() < end && !p.at_eof() {
        p.advance();
    }

    let close = p.current();
    p.expect(RIGHT_PAREN)?;
    let raw_end = close.map_or(start, Token::end);
    let raw = Node::with_info(
        raw_info,
        NodeKind::Raw { value: p.slice(start, raw_end).to_owned() },
    );

    p.skip_sc();
    Ok(Node::with_info(info, NodeKind::Progid { value: Box::new(raw) }))
}

#[cfg(test)]
mod tests {
    use crate::{Context, ParseOptions, parse};

    fn value_of(text: &str) -> sheaf_ast::Node {
        parse(text, &ParseOptions::default().context(Context::Value)).unwrap()
    }

    #[test]
    fn unicode_ranges() {
        for text in ["U+26", "u+0-7F", "U+0025-00FF", "u+4??"] {
            let node = value_of(text);
            let sheaf_ast::NodeKind::Value { sequence, .. } = &node.kind else { panic!() };
            let names = sequence.map(|node| match &node.kind {
                sheaf_ast::NodeKind::Identifier { name } => name.clone(),
                _ => String::new(),
            });
            assert_eq!(names, [text]);
        }
    }

    #[test]
    fn invalid_unicode_ranges() {
        for text in ["U+1234567", "U+xyz"] {
            let error = parse(text, &ParseOptions::default().context(Context::Value)).unwrap_err();
            assert_eq!(error.message(), "Unexpected input");
        }
    }
}
