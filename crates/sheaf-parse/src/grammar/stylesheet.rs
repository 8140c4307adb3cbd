use sheaf_ast::{List, Node, NodeKind};
use sheaf_tokenizer::TokenKind::*;
use text_size::TextSize;

use super::{Scope, any, ident_end, operator, read_ident, remove_trailing_spaces, space};
use super::{selectors, values};
use crate::parser::{PResult, Parser};

/// Rules until end of input, or until the closing `}` of a nested at-rule
/// body. Comments are dropped except `/*! ... */` at the top level.
pub(crate) fn stylesheet(p: &mut Parser<'_>, nested: bool) -> PResult<Node> {
    let info = p.info();
    let mut rules = List::new();

    while let Some(token) = p.current() {
        let child = match token.kind {
            WHITESPACE => {
                p.advance();
                continue;
            }
            COMMENT => {
                if nested || p.byte_at(token.start() + TextSize::new(2)) != Some(b'!') {
                    p.advance();
                    continue;
                }
                comment(p)
            }
            UNKNOWN => unknown(p),
            COMMERCIAL_AT => atrule(p)?,
            RIGHT_BRACE => {
                if !nested {
                    return Err(p.error("Unexpected right curly brace"));
                }
                break;
            }
            _ => ruleset(p)?,
        };

        rules.append(child);
    }

    Ok(Node::with_info(info, NodeKind::StyleSheet { rules }))
}

fn comment(p: &mut Parser<'_>) -> Node {
    let info = p.info();
    let body = p.current_text().get(2..).unwrap_or_default();
    let value = match body.strip_suffix("*/") {
        Some(value) if body.len() >= 2 => value,
        _ => body,
    };
    let value = value.to_owned();
    p.advance();

    Node::with_info(info, NodeKind::Comment { value })
}

fn unknown(p: &mut Parser<'_>) -> Node {
    let info = p.info();
    let value = p.current_text().to_owned();
    p.advance();

    Node::with_info(info, NodeKind::Unknown { value })
}

/// `@name expression ;` or `@name expression { ... }`.
pub(crate) fn atrule(p: &mut Parser<'_>) -> PResult<Node> {
    p.expect(COMMERCIAL_AT)?;

    let info = p.info();
    let name = read_ident(p, false)?;
    let expression = atrule_expression(p)?;
    let mut body = None;

    match p.peek_kind() {
        None => {}
        Some(SEMICOLON) => p.advance(),
        Some(LEFT_BRACE) => {
            p.advance();
            let node = if is_block_atrule(p) { block(p)? } else { stylesheet(p, true)? };
            body = Some(Box::new(node));
            p.expect(RIGHT_BRACE)?;
        }
        Some(_) => return Err(p.error("Unexpected input")),
    }

    Ok(Node::with_info(
        info,
        NodeKind::Atrule { name, expression: Some(Box::new(expression)), block: body },
    ))
}

/// An at-rule body holds declarations when its first `}` comes before any
/// `{` or `@`; otherwise it holds rules.
fn is_block_atrule(p: &Parser<'_>) -> bool {
    let mut k = 0;
    while let Some(token) = p.nth(k) {
        match token.kind {
            RIGHT_BRACE => return true,
            LEFT_BRACE | COMMERCIAL_AT => return false,
            _ => k += 1,
        }
    }
    true
}

pub(crate) fn atrule_expression(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    let mut sequence = List::new();

    while let Some(kind) = p.peek_kind() {
        let child = match kind {
            SEMICOLON | LEFT_BRACE => break,
            WHITESPACE if sequence.is_empty() => {
                p.advance();
                continue;
            }
            WHITESPACE => space(p),
            COMMENT => {
                p.advance();
                continue;
            }
            COMMA => operator(p),
            COLON => selectors::pseudo(p)?,
            LEFT_PAREN => values::braces(p, Scope::AtruleExpression)?,
            _ => any(p, Scope::AtruleExpression)?,
        };

        sequence.append(child);
    }

    remove_trailing_spaces(&mut sequence);
    Ok(Node::with_info(info, NodeKind::AtruleExpression { sequence }))
}

pub(crate) fn ruleset(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    let selector = selectors::selector(p)?;
    let block = block_with_brackets(p)?;

    Ok(Node::with_info(
        info,
        NodeKind::Ruleset { selector: Box::new(selector), block: Box::new(block) },
    ))
}

fn block_with_brackets(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    p.expect(LEFT_BRACE)?;
    let declarations = declarations(p)?;
    p.expect(RIGHT_BRACE)?;

    Ok(Node::with_info(info, NodeKind::Block { declarations }))
}

/// Declarations up to a `}` (not consumed) or end of input.
pub(crate) fn block(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    let declarations = declarations(p)?;

    Ok(Node::with_info(info, NodeKind::Block { declarations }))
}

fn declarations(p: &mut Parser<'_>) -> PResult<List<Node>> {
    let mut declarations = List::new();

    while let Some(kind) = p.peek_kind() {
        match kind {
            RIGHT_BRACE => break,
            WHITESPACE | COMMENT | SEMICOLON => p.advance(),
            _ => {
                declarations.append(declaration(p)?);
            }
        }
    }

    Ok(declarations)
}

pub(crate) fn declaration(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    let property = property(p)?;
    p.expect(COLON)?;

    let is_filter = match &property.kind {
        NodeKind::Property { name } => ends_with_filter(name),
        _ => false,
    };
    let value = if is_filter && values::progid_end(p).is_some() {
        values::filter_value(p)?
    } else {
        values::value(p, false)?
    };

    Ok(Node::with_info(
        info,
        NodeKind::Declaration { property: Box::new(property), value: Box::new(value) },
    ))
}

fn ends_with_filter(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 6 && bytes[bytes.len() - 6..].eq_ignore_ascii_case(b"filter")
}

/// A property name, including hack prefixes (`*zoom`, `$x`, `/x`) and custom
/// property names (`--x`).
pub(crate) fn property(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    let start = p.offset();

    while matches!(p.peek_kind(), Some(SOLIDUS | ASTERISK | DOLLAR_SIGN)) {
        p.advance();
    }

    let end = ident_end(p, true)?;
    let name = p.slice(start, end).to_owned();
    p.skip_sc();

    Ok(Node::with_info(info, NodeKind::Property { name }))
}

#[cfg(test)]
mod tests {
    use super::ends_with_filter;

    #[test]
    fn filter_suffix() {
        assert!(ends_with_filter("filter"));
        assert!(ends_with_filter("-ms-FILTER"));
        assert!(!ends_with_filter("filters"));
        assert!(!ends_with_filter("fil"));
    }
}
