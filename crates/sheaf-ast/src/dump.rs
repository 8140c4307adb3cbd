use std::fmt::Write as _;

use crate::walk::for_each_child;
use crate::{Node, NodeKind};

/// Renders `node` as an indented tree, one node per line, with scalar fields
/// quoted and `@line:column` appended for positioned nodes.
pub fn dump(node: &Node) -> String {
    let mut out = String::new();
    dump_node(&mut out, node, 0);
    out
}

fn dump_node(out: &mut String, node: &Node, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(node.name());

    match &node.kind {
        NodeKind::Atrule { name, .. }
        | NodeKind::FunctionalPseudo { name, .. }
        | NodeKind::Function { name, .. }
        | NodeKind::Property { name }
        | NodeKind::Combinator { name }
        | NodeKind::Identifier { name }
        | NodeKind::PseudoClass { name }
        | NodeKind::PseudoElement { name }
        | NodeKind::Class { name }
        | NodeKind::Id { name } => {
            let _ = write!(out, " {name:?}");
        }
        NodeKind::Hash { value }
        | NodeKind::Nth { value }
        | NodeKind::Number { value }
        | NodeKind::String { value }
        | NodeKind::Operator { value }
        | NodeKind::Raw { value }
        | NodeKind::Unknown { value }
        | NodeKind::Percentage { value }
        | NodeKind::Comment { value } => {
            let _ = write!(out, " {value:?}");
        }
        NodeKind::Dimension { value, unit } => {
            let _ = write!(out, " {value:?} {unit:?}");
        }
        NodeKind::Value { important: true, .. } => out.push_str(" !important"),
        NodeKind::Attribute { operator, flags, .. } => {
            if let Some(operator) = operator {
                let _ = write!(out, " {operator:?}");
            }
            if let Some(flags) = flags {
                let _ = write!(out, " flags={flags:?}");
            }
        }
        NodeKind::Braces { open, close, .. } => {
            let _ = write!(out, " {open:?} {close:?}");
        }
        _ => {}
    }

    if let Some(info) = &node.info {
        let _ = write!(out, " @{}:{}", info.line, info.column);
    }
    out.push('\n');

    for_each_child(&node.kind, |child| dump_node(out, child, depth + 1));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::SourceInfo;

    #[test]
    fn nested_tree() {
        let source: Arc<str> = Arc::from("<unknown>");
        let info = |column| Some(SourceInfo { source: source.clone(), offset: 0, line: 1, column });

        let value = Node::new(NodeKind::Value {
            important: true,
            sequence: [
                Node::with_info(
                    info(3),
                    NodeKind::Dimension { value: "1".into(), unit: "px".into() },
                ),
                Node::new(NodeKind::Space),
                Node::new(NodeKind::Braces { open: '(', close: ')', sequence: Default::default() }),
            ]
            .into_iter()
            .collect(),
        });

        assert_eq!(
            dump(&value),
            "Value !important\n  Dimension \"1\" \"px\" @1:3\n  Space\n  Braces '(' ')'\n"
        );
    }
}
