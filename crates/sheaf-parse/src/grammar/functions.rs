use sheaf_ast::{List, Node, NodeKind};
use sheaf_tokenizer::TokenKind::*;

use super::{
    Ident, Scope, Special, any, argument, identifier, operator, remove_trailing_spaces, selectors,
    space, string, values,
};
use crate::parser::{PResult, Parser};

/// `name(...)` with the name already read. Names with their own grammar in
/// `scope` are dispatched to it; everything else takes comma separated
/// argument sequences.
pub(crate) fn function(p: &mut Parser<'_>, scope: Scope, ident: Ident) -> PResult<Node> {
    match scope.special(&ident.name) {
        Some(Special::Url) => url(p, ident),
        Some(Special::Not) => negation(p, ident),
        Some(Special::Expression) => expression(p, ident),
        Some(Special::Var) => var(p, ident),
        None => generic(p, scope, ident),
    }
}

fn generic(p: &mut Parser<'_>, scope: Scope, ident: Ident) -> PResult<Node> {
    p.expect(LEFT_PAREN)?;
    let arguments = arguments(p, scope)?;
    p.expect(RIGHT_PAREN)?;

    let Ident { info, name } = ident;
    let kind = match scope {
        Scope::Selector => NodeKind::FunctionalPseudo { name, arguments },
        Scope::AtruleExpression | Scope::Value => NodeKind::Function { name, arguments },
    };
    Ok(Node::with_info(info, kind))
}

fn arguments(p: &mut Parser<'_>, scope: Scope) -> PResult<List<Node>> {
    let mut arguments = List::new();
    let mut current: Option<List<Node>> = None;

    p.skip_sc();

    while let Some(kind) = p.peek_kind() {
        let child = match kind {
            // `f(a,)`: the comma left an argument with nothing in it
            RIGHT_PAREN if current.is_none() && !arguments.is_empty() => {
                return Err(p.error("Unexpected input"));
            }
            RIGHT_PAREN => break,
            WHITESPACE => space(p),
            COMMENT => {
                p.advance();
                continue;
            }
            NUMBER_SIGN => values::hash(p)?,
            LEFT_PAREN | LEFT_BRACKET => values::braces(p, scope)?,
            COMMA => {
                let Some(mut sequence) = current.take() else {
                    return Err(p.error("Unexpected input"));
                };
                remove_trailing_spaces(&mut sequence);
                arguments.append(argument(sequence));

                p.advance();
                p.skip_sc();
                continue;
            }
            SOLIDUS | ASTERISK | COLON | EQUALS => operator(p),
            _ => any(p, scope)?,
        };

        current.get_or_insert_with(List::new).append(child);
    }

    if let Some(mut sequence) = current {
        remove_trailing_spaces(&mut sequence);
        arguments.append(argument(sequence));
    }

    Ok(arguments)
}

/// `:not(simple, simple, ...)` with at least one simple selector and no
/// empty entries.
fn negation(p: &mut Parser<'_>, ident: Ident) -> PResult<Node> {
    p.expect(LEFT_PAREN)?;

    let mut sequence = List::new();
    let mut was_selector = false;

    while let Some(kind) = p.peek_kind() {
        match kind {
            RIGHT_PAREN => {
                if !was_selector {
                    return Err(p.error("Simple selector is expected"));
                }
                break;
            }
            COMMA => {
                if !was_selector {
                    return Err(p.error("Simple selector is expected"));
                }
                was_selector = false;
                p.advance();
            }
            _ => {
                was_selector = true;
                sequence.append(selectors::simple_selector(p, true)?);
            }
        }
    }

    p.expect(RIGHT_PAREN)?;
    Ok(Node::with_info(ident.info, NodeKind::Negation { sequence }))
}

/// `var(--name)` or `var(--name, fallback)`; the fallback is a whole value.
fn var(p: &mut Parser<'_>, ident: Ident) -> PResult<Node> {
    p.expect(LEFT_PAREN)?;
    p.skip_sc();

    let mut arguments = List::new();
    arguments.append(argument(List::from_iter([identifier(p, true)?])));
    p.skip_sc();

    if p.at(COMMA) {
        p.advance();
        p.skip_sc();
        arguments.append(argument(List::from_iter([values::value(p, true)?])));
        p.skip_sc();
    }

    p.expect(RIGHT_PAREN)?;
    Ok(Node::with_info(ident.info, NodeKind::Function { name: ident.name, arguments }))
}

/// `url("...")` or `url(raw)`.
fn url(p: &mut Parser<'_>, ident: Ident) -> PResult<Node> {
    p.expect(LEFT_PAREN)?;
    p.skip_sc();

    let value = if p.at(STRING) {
        string(p)
    } else {
        let info = p.info();
        let start = p.offset();
        let mut end = start;

        while let Some(token) = p.current() {
            if matches!(token.kind, WHITESPACE | LEFT_PAREN | RIGHT_PAREN) {
                break;
            }
            end = token.end();
            p.advance();
        }

        Node::with_info(info, NodeKind::Raw { value: p.slice(start, end).to_owned() })
    };

    p.skip_sc();
    p.expect(RIGHT_PAREN)?;
    Ok(Node::with_info(ident.info, NodeKind::Url { value: Box::new(value) }))
}

/// Old IE `expression(...)`: the body is script, kept verbatim up to the
/// balanced closing parenthesis.
fn expression(p: &mut Parser<'_>, ident: Ident) -> PResult<Node> {
    p.expect(LEFT_PAREN)?;

    let start = p.offset();
    let mut end = start;
    let mut depth = 0usize;

    while let Some(token) = p.current() {
        match token.kind {
            RIGHT_PAREN if depth == 0 => break,
            RIGHT_PAREN => depth -= 1,
            LEFT_PAREN => depth += 1,
            _ => {}
        }
        end = token.end();
        p.advance();
    }

    p.expect(RIGHT_PAREN)?;

    let raw = Node::new(NodeKind::Raw { value: p.slice(start, end).to_owned() });
    let arguments = List::from_iter([argument(List::from_iter([raw]))]);
    Ok(Node::with_info(ident.info, NodeKind::Function { name: ident.name, arguments }))
}
