//! Depth-first traversal over a tree.
//!
//! Children are visited in source order. Nodes never point back at their
//! parent; passes that need siblings work on the owning [`List`] through
//! [`walk_lists_mut`].

use crate::{List, Node, NodeKind};

/// Visits `node` and then every descendant.
pub fn walk<'a>(node: &'a Node, visit: &mut impl FnMut(&'a Node)) {
    visit(node);
    for_each_child(&node.kind, |child| walk(child, visit));
}

/// Visits every descendant of `node` and then `node` itself.
pub fn walk_post<'a>(node: &'a Node, visit: &mut impl FnMut(&'a Node)) {
    for_each_child(&node.kind, |child| walk_post(child, visit));
    visit(node);
}

/// Pre-order walk that may edit each node. Children are taken from the node
/// as it is after `visit` returns, so replacing a node's kind redirects the
/// walk into the new children.
pub fn walk_mut(node: &mut Node, visit: &mut impl FnMut(&mut Node)) {
    visit(node);
    for_each_child_mut(&mut node.kind, |child| walk_mut(child, visit));
}

pub fn walk_post_mut(node: &mut Node, visit: &mut impl FnMut(&mut Node)) {
    for_each_child_mut(&mut node.kind, |child| walk_post_mut(child, visit));
    visit(node);
}

/// Hands every child list in the tree to `visit` before descending into the
/// elements left in it.
pub fn walk_lists_mut(node: &mut Node, visit: &mut impl FnMut(&mut List<Node>)) {
    match &mut node.kind {
        NodeKind::Atrule { expression, block, .. } => {
            for child in [expression, block].into_iter().flatten() {
                walk_lists_mut(child, visit);
            }
        }
        NodeKind::Ruleset { selector: first, block: second }
        | NodeKind::Declaration { property: first, value: second } => {
            walk_lists_mut(first, visit);
            walk_lists_mut(second, visit);
        }
        NodeKind::Attribute { name, value, .. } => {
            walk_lists_mut(name, visit);
            if let Some(value) = value {
                walk_lists_mut(value, visit);
            }
        }
        NodeKind::Url { value } | NodeKind::Progid { value } => walk_lists_mut(value, visit),
        kind => {
            if let Some(list) = child_list_mut(kind) {
                visit(list);
                list.for_each_mut(|child| walk_lists_mut(child, visit));
            }
        }
    }
}

// Shared by both borrow flavours; match ergonomics pick `&` or `&mut`.
macro_rules! child_list {
    ($kind:expr) => {
        match $kind {
            NodeKind::StyleSheet { rules: list }
            | NodeKind::AtruleExpression { sequence: list }
            | NodeKind::Selector { selectors: list }
            | NodeKind::SimpleSelector { sequence: list }
            | NodeKind::Block { declarations: list }
            | NodeKind::Value { sequence: list, .. }
            | NodeKind::FunctionalPseudo { arguments: list, .. }
            | NodeKind::Function { arguments: list, .. }
            | NodeKind::Negation { sequence: list }
            | NodeKind::Braces { sequence: list, .. }
            | NodeKind::Argument { sequence: list } => Some(list),
            _ => None,
        }
    };
}

fn child_list(kind: &NodeKind) -> Option<&List<Node>> {
    child_list!(kind)
}

fn child_list_mut(kind: &mut NodeKind) -> Option<&mut List<Node>> {
    child_list!(kind)
}

pub(crate) fn for_each_child<'a>(kind: &'a NodeKind, mut f: impl FnMut(&'a Node)) {
    match kind {
        NodeKind::Atrule { expression, block, .. } => {
            for child in expression.iter().chain(block.iter()) {
                f(child.as_ref());
            }
        }
        NodeKind::Ruleset { selector: first, block: second }
        | NodeKind::Declaration { property: first, value: second } => {
            f(first.as_ref());
            f(second.as_ref());
        }
        NodeKind::Attribute { name, value, .. } => {
            f(name.as_ref());
            if let Some(value) = value {
                f(value.as_ref());
            }
        }
        NodeKind::Url { value } | NodeKind::Progid { value } => f(value.as_ref()),
        kind => {
            if let Some(list) = child_list(kind) {
                list.iter().for_each(f);
            }
        }
    }
}

fn for_each_child_mut(kind: &mut NodeKind, mut f: impl FnMut(&mut Node)) {
    match kind {
        NodeKind::Atrule { expression, block, .. } => {
            for child in [expression, block].into_iter().flatten() {
                f(child.as_mut());
            }
        }
        NodeKind::Ruleset { selector: first, block: second }
        | NodeKind::Declaration { property: first, value: second } => {
            f(first.as_mut());
            f(second.as_mut());
        }
        NodeKind::Attribute { name, value, .. } => {
            f(name.as_mut());
            if let Some(value) = value {
                f(value.as_mut());
            }
        }
        NodeKind::Url { value } | NodeKind::Progid { value } => f(value.as_mut()),
        kind => {
            if let Some(list) = child_list_mut(kind) {
                list.for_each_mut(f);
            }
        }
    }
}
