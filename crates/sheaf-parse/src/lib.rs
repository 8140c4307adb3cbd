//! Recursive-descent CSS parser producing a [`sheaf_ast::Node`] tree.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use sheaf_ast::Node;
pub use sheaf_errors::{ConfigError, Error, SyntaxError};

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

/// Entry production of a parse.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Context {
    #[default]
    Stylesheet,
    Atrule,
    AtruleExpression,
    Ruleset,
    Selector,
    SimpleSelector,
    Block,
    Declaration,
    Property,
    Value,
}

impl Context {
    pub const ALL: [Self; 10] = [
        Self::Stylesheet,
        Self::Atrule,
        Self::AtruleExpression,
        Self::Ruleset,
        Self::Selector,
        Self::SimpleSelector,
        Self::Block,
        Self::Declaration,
        Self::Property,
        Self::Value,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stylesheet => "stylesheet",
            Self::Atrule => "atrule",
            Self::AtruleExpression => "atruleExpression",
            Self::Ruleset => "ruleset",
            Self::Selector => "selector",
            Self::SimpleSelector => "simpleSelector",
            Self::Block => "block",
            Self::Declaration => "declaration",
            Self::Property => "property",
            Self::Value => "value",
        }
    }

    /// Whether the input is already inside a `{ }` block, which changes how
    /// the scanner treats `//`.
    pub fn starts_in_block(self) -> bool {
        matches!(self, Self::Block | Self::Declaration | Self::Property | Self::Value)
    }
}

impl FromStr for Context {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|context| context.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownContext(name.to_owned()))
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct ParseOptions {
    pub context: Context,
    /// Record a [`sheaf_ast::SourceInfo`] on every positioned node.
    pub positions: bool,
    pub filename: Arc<str>,
    /// Line number of the first line of the input.
    pub line: u32,
    /// Column number of the first character of the input.
    pub column: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            context: Context::Stylesheet,
            positions: false,
            filename: Arc::from("<unknown>"),
            line: 1,
            column: 1,
        }
    }
}

impl ParseOptions {
    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn positions(mut self, positions: bool) -> Self {
        self.positions = positions;
        self
    }

    pub fn filename(mut self, filename: impl Into<Arc<str>>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    pub fn column(mut self, column: u32) -> Self {
        self.column = column;
        self
    }
}

/// Parses `text` starting at the production selected by `options.context`.
///
/// Fails on the first grammar violation; there is no partial tree.
pub fn parse(text: &str, options: &ParseOptions) -> Result<Node, SyntaxError> {
    let mut p = parser::Parser::new(text, options);
    tracing::debug!(
        context = %options.context,
        len = text.len(),
        tokens = p.token_count(),
        "parse"
    );
    p.report_extensions();

    let p = &mut p;
    match options.context {
        Context::Stylesheet => grammar::stylesheet(p, false),
        Context::Atrule => grammar::atrule(p),
        Context::AtruleExpression => grammar::atrule_expression(p),
        Context::Ruleset => grammar::ruleset(p),
        Context::Selector => grammar::selector(p),
        Context::SimpleSelector => grammar::simple_selector(p, false),
        Context::Block => grammar::block(p),
        Context::Declaration => grammar::declaration(p),
        Context::Property => grammar::property(p),
        Context::Value => grammar::value(p, false),
    }
}

/// Like [`parse`], with the context given by name.
pub fn parse_in(text: &str, context: &str, options: ParseOptions) -> Result<Node, Error> {
    let context = context.parse()?;
    Ok(parse(text, &options.context(context))?)
}
