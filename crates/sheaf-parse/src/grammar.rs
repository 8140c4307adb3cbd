use sheaf_ast::{List, Node, NodeKind, SourceInfo};
use sheaf_tokenizer::TokenKind::*;
use text_size::TextSize;

use crate::parser::{PResult, Parser};

mod functions;
mod selectors;
mod stylesheet;
mod values;

pub(crate) use selectors::{selector, simple_selector};
pub(crate) use stylesheet::{
    atrule, atrule_expression, block, declaration, property, ruleset, stylesheet,
};
pub(crate) use values::value;

/// Which grammar a parenthesized construct appears in. Some function names
/// get their own argument grammar, but only in particular scopes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Scope {
    AtruleExpression,
    Selector,
    Value,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Special {
    Url,
    Not,
    Expression,
    Var,
}

impl Scope {
    pub(crate) fn special(self, name: &str) -> Option<Special> {
        let special = match name.to_ascii_lowercase().as_str() {
            "url" => Special::Url,
            "not" => Special::Not,
            "expression" => Special::Expression,
            "var" => Special::Var,
            _ => return None,
        };

        let allowed = match special {
            Special::Url => true,
            Special::Not => self == Self::Selector,
            Special::Expression | Special::Var => self == Self::Value,
        };
        allowed.then_some(special)
    }
}

/// An identifier read off the token stream before deciding what node it
/// belongs to.
pub(crate) struct Ident {
    pub(crate) info: Option<SourceInfo>,
    pub(crate) name: String,
}

impl Ident {
    pub(crate) fn into_node(self) -> Node {
        Node::with_info(self.info, NodeKind::Identifier { name: self.name })
    }
}

pub(crate) struct Numeric {
    pub(crate) info: Option<SourceInfo>,
    pub(crate) value: String,
}

impl Numeric {
    pub(crate) fn into_node(self) -> Node {
        Node::with_info(self.info, NodeKind::Number { value: self.value })
    }
}

/// Reads an identifier that may span several tokens, since `-` and digits
/// are tokens of their own: an optional leading `-` (`--` when `custom` is
/// set), a name token, then any run of name, number and `-` tokens. Returns
/// the end offset.
pub(crate) fn ident_end(p: &mut Parser<'_>, custom: bool) -> PResult<TextSize> {
    if p.at(HYPHEN_MINUS) {
        p.advance();
        if custom && p.at(HYPHEN_MINUS) {
            p.advance();
        }
    }

    let first = p.expect_any("Identifier", &[LOW_LINE, IDENT])?;
    let mut end = first.end();
    p.advance();

    while let Some(token) = p.current() {
        if !matches!(token.kind, LOW_LINE | IDENT | NUMBER | HYPHEN_MINUS) {
            break;
        }
        end = token.end();
        p.advance();
    }

    Ok(end)
}

pub(crate) fn read_ident(p: &mut Parser<'_>, custom: bool) -> PResult<String> {
    let start = p.offset();
    let end = ident_end(p, custom)?;
    Ok(p.slice(start, end).to_owned())
}

pub(crate) fn ident(p: &mut Parser<'_>, custom: bool) -> PResult<Ident> {
    let info = p.info();
    let name = read_ident(p, custom)?;
    Ok(Ident { info, name })
}

pub(crate) fn identifier(p: &mut Parser<'_>, custom: bool) -> PResult<Node> {
    ident(p, custom).map(Ident::into_node)
}

/// `ns|name`, `*|name`, `|name`, `*` or a plain name. With `check_colon`, a
/// following `:name` is folded into the identifier (`xlink:href`).
pub(crate) fn namespaced_identifier(p: &mut Parser<'_>, mut check_colon: bool) -> PResult<Node> {
    let Some(first) = p.current() else {
        return Err(p.error("Unexpected end of input"));
    };

    let info = p.info();
    let start = first.start();
    let mut end = start;

    if first.kind == ASTERISK {
        check_colon = false;
        end = first.end();
        p.advance();
    } else if !(first.kind == VERTICAL_LINE && !p.nth_at(1, EQUALS)) {
        end = ident_end(p, false)?;
    }

    if p.at(VERTICAL_LINE) && !p.nth_at(1, EQUALS) {
        end = p.offset() + TextSize::of('|');
        p.advance();

        match p.current() {
            Some(token) if matches!(token.kind, HYPHEN_MINUS | IDENT | LOW_LINE) => {
                end = ident_end(p, false)?;
            }
            Some(token) if token.kind == ASTERISK => {
                check_colon = false;
                end = token.end();
                p.advance();
            }
            _ => {}
        }
    }

    if check_colon && p.at(COLON) {
        p.advance();
        end = ident_end(p, false)?;
    }

    let name = p.slice(start, end).to_owned();
    Ok(Node::with_info(info, NodeKind::Identifier { name }))
}

/// Number of tokens forming a number at the cursor (`-`? digits? (`.` digits)?
/// with at least one digit run), or `None`.
pub(crate) fn number_len(p: &Parser<'_>) -> Option<usize> {
    let mut len = 0;
    let mut digits = false;

    if p.nth_at(len, HYPHEN_MINUS) {
        len += 1;
    }
    if p.nth_at(len, NUMBER) {
        digits = true;
        len += 1;
    }
    if p.nth_at(len, FULL_STOP) {
        len += 1;
    }
    if p.nth_at(len, NUMBER) {
        digits = true;
        len += 1;
    }

    digits.then_some(len)
}

pub(crate) fn numeric(p: &mut Parser<'_>) -> Option<Numeric> {
    let len = number_len(p)?;
    let info = p.info();
    let start = p.offset();
    let mut end = start;

    for _ in 0..len {
        if let Some(token) = p.current() {
            end = token.end();
        }
        p.advance();
    }

    Some(Numeric { info, value: p.slice(start, end).to_owned() })
}

pub(crate) fn percentage(p: &mut Parser<'_>, number: Numeric) -> PResult<Node> {
    p.expect(PERCENT_SIGN)?;
    Ok(Node::with_info(number.info, NodeKind::Percentage { value: number.value }))
}

pub(crate) fn string(p: &mut Parser<'_>) -> Node {
    let info = p.info();
    let value = p.current_text().to_owned();
    p.advance();
    Node::with_info(info, NodeKind::String { value })
}

pub(crate) fn operator(p: &mut Parser<'_>) -> Node {
    let info = p.info();
    let value = p.current_text().to_owned();
    p.advance();
    Node::with_info(info, NodeKind::Operator { value })
}

pub(crate) fn space(p: &mut Parser<'_>) -> Node {
    p.advance();
    Node::new(NodeKind::Space)
}

pub(crate) fn argument(sequence: List<Node>) -> Node {
    Node::new(NodeKind::Argument { sequence })
}

pub(crate) fn remove_trailing_spaces(list: &mut List<Node>) {
    while list.last().is_some_and(Node::is_space) {
        list.pop_back();
    }
}

/// string | percentage | dimension | number | operator | identifier | function
pub(crate) fn any(p: &mut Parser<'_>, scope: Scope) -> PResult<Node> {
    match p.peek_kind() {
        Some(STRING) => return Ok(string(p)),
        Some(LOW_LINE | IDENT) => {}
        Some(FULL_STOP | NUMBER | HYPHEN_MINUS | PLUS) => {
            if let Some(number) = numeric(p) {
                return match p.peek_kind() {
                    Some(PERCENT_SIGN) => percentage(p, number),
                    Some(IDENT) => values::dimension(p, number),
                    _ => Ok(number.into_node()),
                };
            }

            let next = p.nth(1).map(|token| token.kind);
            match p.peek_kind() {
                Some(HYPHEN_MINUS) if matches!(next, Some(IDENT | HYPHEN_MINUS)) => {}
                Some(HYPHEN_MINUS | PLUS) => return Ok(operator(p)),
                _ => return Err(p.error("Unexpected input")),
            }
        }
        _ => return Err(p.error("Unexpected input")),
    }

    let ident = ident(p, false)?;
    if p.at(LEFT_PAREN) {
        return functions::function(p, scope, ident);
    }

    Ok(ident.into_node())
}
