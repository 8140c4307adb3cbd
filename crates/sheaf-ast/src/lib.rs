//! Syntax tree for CSS: node shapes, the child list every node owns, and
//! traversal helpers for rewrite passes.

mod dump;
mod list;
mod node;
pub mod walk;

pub use dump::dump;
pub use list::{Handle, Iter, List};
pub use node::{Node, NodeKind, SourceInfo};
