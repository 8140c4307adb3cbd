use sheaf_ast::{List, Node, NodeKind};
use sheaf_tokenizer::{Token, TokenKind::*};

use super::{
    Scope, argument, functions, ident, identifier, namespaced_identifier, number_len, numeric,
    operator, percentage, read_ident, string,
};
use crate::parser::{PResult, Parser};

/// A comma separated list of simple selectors.
///
/// A malformed list (leading, trailing or doubled comma, or an empty entry) is
/// not an error: its entries are dropped and parsing goes on with the block.
pub(crate) fn selector(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    let mut selectors = List::new();
    let mut malformed = false;
    let mut last_comma = true;

    while let Some(kind) = p.peek_kind() {
        match kind {
            LEFT_BRACE => break,
            COMMA => {
                malformed |= last_comma;
                last_comma = true;
                p.advance();
            }
            _ => {
                malformed |= !last_comma;
                last_comma = false;

                let simple = simple_selector(p, false)?;
                if let NodeKind::SimpleSelector { sequence } = &simple.kind {
                    malformed |= sequence.is_empty();
                }
                selectors.append(simple);
            }
        }
    }

    if last_comma || malformed {
        tracing::debug!(offset = u32::from(p.offset()), "discarding malformed selector list");
        selectors = List::new();
    }

    Ok(Node::with_info(info, NodeKind::Selector { selectors }))
}

/// Compound selectors joined by combinators. Inside `:not(...)` (`nested`)
/// the sequence ends at `)`, elsewhere at `,` or `{`.
pub(crate) fn simple_selector(p: &mut Parser<'_>, nested: bool) -> PResult<Node> {
    let info = p.info();
    let mut sequence = List::new();
    let mut pending: Option<Node> = None;

    while let Some(kind) = p.peek_kind() {
        let child = match kind {
            COMMA => break,
            LEFT_BRACE => {
                if nested {
                    return Err(p.error("Unexpected input"));
                }
                break;
            }
            RIGHT_PAREN => {
                if !nested {
                    return Err(p.error("Unexpected input"));
                }
                break;
            }
            COMMENT => {
                p.advance();
                continue;
            }
            WHITESPACE => {
                if pending.is_none() && !sequence.is_empty() {
                    pending = Some(combinator(p)?);
                } else {
                    p.advance();
                }
                continue;
            }
            PLUS | GREATER_THAN | TILDE | SOLIDUS => {
                if pending.as_ref().is_some_and(|node| !is_descendant(node)) {
                    return Err(p.error("Unexpected combinator"));
                }
                pending = Some(combinator(p)?);
                continue;
            }
            FULL_STOP => class(p)?,
            LEFT_BRACKET => attribute(p)?,
            NUMBER_SIGN => id(p)?,
            COLON => pseudo(p)?,
            LOW_LINE | IDENT | ASTERISK | VERTICAL_LINE => namespaced_identifier(p, false)?,
            HYPHEN_MINUS | NUMBER => match keyframe_percentage(p)? {
                Some(node) => node,
                None => namespaced_identifier(p, false)?,
            },
            _ => return Err(p.error("Unexpected input")),
        };

        if let Some(node) = pending.take() {
            sequence.append(node);
        }
        sequence.append(child);
    }

    if pending.as_ref().is_some_and(|node| !is_descendant(node)) {
        return Err(p.error("Unexpected combinator"));
    }

    Ok(Node::with_info(info, NodeKind::SimpleSelector { sequence }))
}

fn is_descendant(node: &Node) -> bool {
    matches!(&node.kind, NodeKind::Combinator { name } if name == " ")
}

/// `10%` in a keyframe selector. Nothing is consumed unless the number is
/// followed by `%`.
fn keyframe_percentage(p: &mut Parser<'_>) -> PResult<Option<Node>> {
    match number_len(p) {
        Some(len) if p.nth_at(len, PERCENT_SIGN) => {}
        _ => return Ok(None),
    }

    match numeric(p) {
        Some(number) => percentage(p, number).map(Some),
        None => Ok(None),
    }
}

/// whitespace | `+` | `>` | `~` | `/deep/`
fn combinator(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();

    let name = match p.peek_kind() {
        Some(WHITESPACE) => {
            p.advance();
            " ".to_owned()
        }
        Some(PLUS | TILDE | GREATER_THAN) => {
            let name = p.current_text().to_owned();
            p.advance();
            name
        }
        Some(SOLIDUS) => {
            p.advance();
            p.expect_identifier("deep", true)?;
            p.expect(SOLIDUS)?;
            "/deep/".to_owned()
        }
        _ => return Err(p.error("Combinator (+, >, ~, /deep/) is expected")),
    };

    Ok(Node::with_info(info, NodeKind::Combinator { name }))
}

fn class(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    p.expect(FULL_STOP)?;
    let name = read_ident(p, false)?;

    Ok(Node::with_info(info, NodeKind::Class { name }))
}

fn id(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    p.expect(NUMBER_SIGN)?;
    let name = read_ident(p, false)?;

    Ok(Node::with_info(info, NodeKind::Id { name }))
}

/// `[name]`, `[name op value]` or `[name op value flags]`.
fn attribute(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    p.expect(LEFT_BRACKET)?;
    p.skip_sc();

    let name = namespaced_identifier(p, true)?;
    p.skip_sc();

    let mut operator = None;
    let mut value = None;
    let mut flags = None;

    if p.peek_kind().is_some_and(|kind| kind != RIGHT_BRACKET) {
        // `[name i]` has flags but no operator
        if !p.at(IDENT) {
            operator = Some(attribute_operator(p)?);
            p.skip_sc();

            let node = if p.at(STRING) { string(p) } else { identifier(p, false)? };
            value = Some(Box::new(node));
            p.skip_sc();
        }

        if p.at(IDENT) {
            flags = Some(p.current_text().to_owned());
            p.advance();
            p.skip_sc();
        }
    }

    p.expect(RIGHT_BRACKET)?;

    Ok(Node::with_info(
        info,
        NodeKind::Attribute { name: Box::new(name), operator, value, flags },
    ))
}

fn attribute_operator(p: &mut Parser<'_>) -> PResult<String> {
    let first = p.expect_any(
        "Attribute selector (=, ~=, ^=, $=, *=, |=)",
        &[EQUALS, TILDE, CIRCUMFLEX, DOLLAR_SIGN, ASTERISK, VERTICAL_LINE],
    )?;

    p.advance();
    if first.kind != EQUALS {
        p.expect(EQUALS)?;
    }

    Ok(p.slice(first.start(), p.offset()).to_owned())
}

/// `::element`, `:nth-*(An+B)`, `:class` or `:function(...)`.
pub(crate) fn pseudo(p: &mut Parser<'_>) -> PResult<Node> {
    let Some(next) = p.nth(1) else {
        p.advance();
        return Err(p.error("Colon or identifier is expected"));
    };

    if next.kind == COLON {
        return pseudo_element(p);
    }
    if next.kind == IDENT && p.matches(next, "nth") {
        return nth_selector(p);
    }
    pseudo_class(p)
}

fn pseudo_element(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    p.expect(COLON)?;
    p.expect(COLON)?;
    let name = read_ident(p, false)?;

    Ok(Node::with_info(info, NodeKind::PseudoElement { name }))
}

fn pseudo_class(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    p.expect(COLON)?;
    let ident = ident(p, false)?;

    if p.at(LEFT_PAREN) {
        return functions::function(p, Scope::Selector, ident);
    }

    Ok(Node::with_info(info, NodeKind::PseudoClass { name: ident.name }))
}

fn nth_selector(p: &mut Parser<'_>) -> PResult<Node> {
    let info = p.info();
    p.expect(COLON)?;
    p.expect_identifier("nth", false)?;
    let name = read_ident(p, false)?;
    p.expect(LEFT_PAREN)?;

    let mut sequence = List::new();
    while let Some(kind) = p.peek_kind() {
        let child = match kind {
            RIGHT_PAREN => break,
            WHITESPACE | COMMENT => {
                p.advance();
                continue;
            }
            HYPHEN_MINUS | PLUS => operator(p),
            _ => nth(p)?,
        };
        sequence.append(child);
    }

    p.expect(RIGHT_PAREN)?;

    let arguments = List::from_iter([argument(sequence)]);
    Ok(Node::with_info(info, NodeKind::FunctionalPseudo { name, arguments }))
}

/// `odd`, `even`, `n`, a number, or a number directly followed by `n`.
fn nth(p: &mut Parser<'_>) -> PResult<Node> {
    let token = p.expect_any("Number, odd or even", &[IDENT, NUMBER])?;
    let info = p.info();

    if token.kind == NUMBER {
        if p.nth(1).is_some_and(|next| next.kind == IDENT && p.matches(next, "n")) {
            p.advance();
        }
    } else if !["n", "odd", "even"].iter().any(|word| p.matches(token, word)) {
        return Err(p.error("Unexpected identifier"));
    }

    let end = p.current().map_or(token.end(), Token::end);
    p.advance();

    let value = p.slice(token.start(), end).to_owned();
    Ok(Node::with_info(info, NodeKind::Nth { value }))
}
