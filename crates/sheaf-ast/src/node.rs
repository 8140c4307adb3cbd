use std::sync::Arc;

use crate::List;

/// Where a node starts in its source text.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SourceInfo {
    /// Name of the source, shared by every node of one parse.
    pub source: Arc<str>,
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Present only when positions were requested, and never on `Space` and
    /// `Argument` nodes.
    pub info: Option<SourceInfo>,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { info: None, kind }
    }

    pub fn with_info(info: Option<SourceInfo>, kind: NodeKind) -> Self {
        Self { info, kind }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_space(&self) -> bool {
        matches!(self.kind, NodeKind::Space)
    }

    pub fn is_operator(&self, value: &str) -> bool {
        matches!(&self.kind, NodeKind::Operator { value: op } if op == value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    StyleSheet {
        rules: List<Node>,
    },
    Atrule {
        name: String,
        expression: Option<Box<Node>>,
        block: Option<Box<Node>>,
    },
    AtruleExpression {
        sequence: List<Node>,
    },
    Ruleset {
        selector: Box<Node>,
        block: Box<Node>,
    },
    Selector {
        selectors: List<Node>,
    },
    SimpleSelector {
        sequence: List<Node>,
    },
    Block {
        declarations: List<Node>,
    },
    Declaration {
        property: Box<Node>,
        value: Box<Node>,
    },
    Property {
        name: String,
    },
    Value {
        important: bool,
        sequence: List<Node>,
    },
    Attribute {
        name: Box<Node>,
        operator: Option<String>,
        value: Option<Box<Node>>,
        flags: Option<String>,
    },
    FunctionalPseudo {
        name: String,
        arguments: List<Node>,
    },
    Function {
        name: String,
        arguments: List<Node>,
    },
    Negation {
        sequence: List<Node>,
    },
    Braces {
        open: char,
        close: char,
        sequence: List<Node>,
    },
    Argument {
        sequence: List<Node>,
    },
    Url {
        value: Box<Node>,
    },
    Progid {
        value: Box<Node>,
    },
    Combinator {
        name: String,
    },
    Identifier {
        name: String,
    },
    PseudoClass {
        name: String,
    },
    PseudoElement {
        name: String,
    },
    Class {
        name: String,
    },
    Id {
        name: String,
    },
    Hash {
        value: String,
    },
    Dimension {
        value: String,
        unit: String,
    },
    Nth {
        value: String,
    },
    Number {
        value: String,
    },
    String {
        value: String,
    },
    Operator {
        value: String,
    },
    Raw {
        value: String,
    },
    Unknown {
        value: String,
    },
    Percentage {
        value: String,
    },
    Space,
    Comment {
        value: String,
    },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StyleSheet { .. } => "StyleSheet",
            Self::Atrule { .. } => "Atrule",
            Self::AtruleExpression { .. } => "AtruleExpression",
            Self::Ruleset { .. } => "Ruleset",
            Self::Selector { .. } => "Selector",
            Self::SimpleSelector { .. } => "SimpleSelector",
            Self::Block { .. } => "Block",
            Self::Declaration { .. } => "Declaration",
            Self::Property { .. } => "Property",
            Self::Value { .. } => "Value",
            Self::Attribute { .. } => "Attribute",
            Self::FunctionalPseudo { .. } => "FunctionalPseudo",
            Self::Function { .. } => "Function",
            Self::Negation { .. } => "Negation",
            Self::Braces { .. } => "Braces",
            Self::Argument { .. } => "Argument",
            Self::Url { .. } => "Url",
            Self::Progid { .. } => "Progid",
            Self::Combinator { .. } => "Combinator",
            Self::Identifier { .. } => "Identifier",
            Self::PseudoClass { .. } => "PseudoClass",
            Self::PseudoElement { .. } => "PseudoElement",
            Self::Class { .. } => "Class",
            Self::Id { .. } => "Id",
            Self::Hash { .. } => "Hash",
            Self::Dimension { .. } => "Dimension",
            Self::Nth { .. } => "Nth",
            Self::Number { .. } => "Number",
            Self::String { .. } => "String",
            Self::Operator { .. } => "Operator",
            Self::Raw { .. } => "Raw",
            Self::Unknown { .. } => "Unknown",
            Self::Percentage { .. } => "Percentage",
            Self::Space => "Space",
            Self::Comment { .. } => "Comment",
        }
    }
}
