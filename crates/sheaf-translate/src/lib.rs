//! Serializes a [`sheaf_ast::Node`] tree back to CSS text, optionally with a
//! source map pointing every rule part back at the parsed input.

use sheaf_ast::{List, Node, NodeKind, SourceInfo};

mod source_map;

pub use source_map::{Mapping, OriginalPosition, Position, SourceMap};

/// Output of [`translate_with_source_map`].
#[derive(Clone, Debug)]
pub struct Translation {
    pub text: String,
    pub map: SourceMap,
}

/// Receives serialized text in output order.
///
/// At-rules, simple selectors and declarations are positioned groups: their
/// text maps back to the node's source position. Style sheets, rulesets,
/// selectors and blocks are groups without a position.
trait Emitter {
    fn text(&mut self, text: &str);

    fn enter(&mut self, _info: Option<&SourceInfo>) {}

    fn leave(&mut self) {}
}

impl Emitter for String {
    fn text(&mut self, text: &str) {
        self.push_str(text);
    }
}

/// Serializes `node` and everything below it.
///
/// A freshly parsed tree comes back as its input minus dropped comments and
/// insignificant whitespace.
pub fn translate(node: &Node) -> String {
    let mut out = String::new();
    emit(&mut out, node);
    tracing::trace!(len = out.len(), "translate");
    out
}

/// Like [`translate`], also recording where each positioned group came from.
///
/// A tree parsed without positions yields a map with no original positions.
pub fn translate_with_source_map(node: &Node) -> Translation {
    let mut builder = source_map::Builder::new();
    emit(&mut builder, node);

    let (text, map) = builder.finish();
    tracing::trace!(len = text.len(), mappings = map.mappings().len(), "translate with source map");
    Translation { text, map }
}

fn emit(out: &mut impl Emitter, node: &Node) {
    match &node.kind {
        NodeKind::StyleSheet { rules } => {
            out.enter(None);
            each(out, rules, "");
            out.leave();
        }
        NodeKind::Atrule { name, expression, block } => {
            out.enter(node.info.as_ref());
            out.text("@");
            out.text(name);

            let expression =
                expression.as_deref().filter(|expression| !is_empty_expression(expression));
            if let Some(expression) = expression {
                out.text(" ");
                emit(out, expression);
            }

            match block {
                Some(block) => {
                    out.text("{");
                    emit(out, block);
                    out.text("}");
                }
                // An unterminated string at the end of the expression reads
                // this `;` as part of the string when parsed again.
                None => out.text(";"),
            }
            out.leave();
        }
        NodeKind::Ruleset { selector, block } => {
            out.enter(None);
            emit(out, selector);
            out.text("{");
            emit(out, block);
            out.text("}");
            out.leave();
        }
        NodeKind::Selector { selectors } => {
            out.enter(None);
            each(out, selectors, ",");
            out.leave();
        }
        NodeKind::SimpleSelector { sequence } => {
            out.enter(node.info.as_ref());
            for child in sequence {
                if matches!(&child.kind, NodeKind::Combinator { name } if name == "/deep/") {
                    out.text(" /deep/ ");
                } else {
                    emit(out, child);
                }
            }
            out.leave();
        }
        NodeKind::Block { declarations } => {
            out.enter(None);
            each(out, declarations, ";");
            out.leave();
        }
        NodeKind::Declaration { property, value } => {
            out.enter(node.info.as_ref());
            emit(out, property);
            out.text(":");
            emit(out, value);
            out.leave();
        }
        NodeKind::Value { important, sequence } => {
            each(out, sequence, "");
            if *important {
                out.text("!important");
            }
        }
        NodeKind::Attribute { name, operator, value, flags } => {
            out.text("[");
            emit(out, name);

            if let Some(operator) = operator {
                out.text(operator);

                if let Some(value) = value {
                    emit(out, value);

                    if let Some(flags) = flags {
                        if !matches!(value.kind, NodeKind::String { .. }) {
                            out.text(" ");
                        }
                        out.text(flags);
                    }
                }
            }
            out.text("]");
        }
        NodeKind::FunctionalPseudo { name, arguments } => {
            out.text(":");
            out.text(name);
            out.text("(");
            each(out, arguments, ",");
            out.text(")");
        }
        NodeKind::Function { name, arguments } => {
            out.text(name);
            out.text("(");
            each(out, arguments, ",");
            out.text(")");
        }
        NodeKind::Negation { sequence } => {
            out.text(":not(");
            each(out, sequence, ",");
            out.text(")");
        }
        NodeKind::Braces { open, close, sequence } => {
            out.text(open.encode_utf8(&mut [0; 4]));
            each(out, sequence, "");
            out.text(close.encode_utf8(&mut [0; 4]));
        }
        NodeKind::Argument { sequence } | NodeKind::AtruleExpression { sequence } => {
            each(out, sequence, "");
        }
        NodeKind::Url { value } => {
            out.text("url(");
            emit(out, value);
            out.text(")");
        }
        NodeKind::Progid { value } => emit(out, value),
        NodeKind::Property { name }
        | NodeKind::Combinator { name }
        | NodeKind::Identifier { name } => out.text(name),
        NodeKind::PseudoClass { name } => {
            out.text(":");
            out.text(name);
        }
        NodeKind::PseudoElement { name } => {
            out.text("::");
            out.text(name);
        }
        NodeKind::Class { name } => {
            out.text(".");
            out.text(name);
        }
        NodeKind::Id { name } => {
            out.text("#");
            out.text(name);
        }
        NodeKind::Hash { value } => {
            out.text("#");
            out.text(value);
        }
        NodeKind::Dimension { value, unit } => {
            out.text(value);
            out.text(unit);
        }
        NodeKind::Percentage { value } => {
            out.text(value);
            out.text("%");
        }
        NodeKind::Nth { value }
        | NodeKind::Number { value }
        | NodeKind::String { value }
        | NodeKind::Operator { value }
        | NodeKind::Raw { value }
        | NodeKind::Unknown { value } => out.text(value),
        NodeKind::Space => out.text(" "),
        NodeKind::Comment { value } => {
            out.text("/*");
            out.text(value);
            out.text("*/");
        }
    }
}

fn each(out: &mut impl Emitter, list: &List<Node>, delimiter: &str) {
    for (index, node) in list.iter().enumerate() {
        if index > 0 && !delimiter.is_empty() {
            out.text(delimiter);
        }
        emit(out, node);
    }
}

fn is_empty_expression(node: &Node) -> bool {
    matches!(&node.kind, NodeKind::AtruleExpression { sequence } if sequence.is_empty())
}

#[cfg(test)]
mod tests {
    use sheaf_ast::{List, Node, NodeKind};

    use super::translate;

    fn ident(name: &str) -> Node {
        Node::new(NodeKind::Identifier { name: name.to_owned() })
    }

    fn string(value: &str) -> Node {
        Node::new(NodeKind::String { value: value.to_owned() })
    }

    fn attribute(value: Option<Node>, operator: Option<&str>, flags: Option<&str>) -> Node {
        Node::new(NodeKind::Attribute {
            name: Box::new(ident("lang")),
            operator: operator.map(str::to_owned),
            value: value.map(Box::new),
            flags: flags.map(str::to_owned),
        })
    }

    #[test]
    fn attribute_flags() {
        let cases = [
            (attribute(None, None, None), "[lang]"),
            (attribute(Some(ident("en")), Some("|="), None), "[lang|=en]"),
            (attribute(Some(ident("en")), Some("="), Some("i")), "[lang=en i]"),
            (attribute(Some(string("'en'")), Some("="), Some("i")), "[lang='en'i]"),
            // flags without an operator are not written
            (attribute(None, None, Some("i")), "[lang]"),
        ];

        for (node, expected) in cases {
            assert_eq!(translate(&node), expected);
        }
    }

    #[test]
    fn empty_atrule_expression_has_no_space() {
        let expression = Node::new(NodeKind::AtruleExpression { sequence: List::new() });
        let node = Node::new(NodeKind::Atrule {
            name: "font-face".to_owned(),
            expression: Some(Box::new(expression)),
            block: Some(Box::new(Node::new(NodeKind::Block { declarations: List::new() }))),
        });

        assert_eq!(translate(&node), "@font-face{}");
    }

    #[test]
    fn deep_combinator_is_spaced() {
        let sequence = List::from_iter([
            ident("a"),
            Node::new(NodeKind::Combinator { name: "/deep/".to_owned() }),
            ident("b"),
        ]);
        let node = Node::new(NodeKind::SimpleSelector { sequence });

        assert_eq!(translate(&node), "a /deep/ b");
    }

    #[test]
    fn scalars() {
        let cases = [
            (NodeKind::Dimension { value: "1".into(), unit: "px".into() }, "1px"),
            (NodeKind::Percentage { value: "50".into() }, "50%"),
            (NodeKind::Hash { value: "fff".into() }, "#fff"),
            (NodeKind::PseudoElement { name: "before".into() }, "::before"),
            (NodeKind::Comment { value: "! keep ".into() }, "/*! keep */"),
            (NodeKind::Space, " "),
        ];

        for (kind, expected) in cases {
            assert_eq!(translate(&Node::new(kind)), expected);
        }
    }
}
