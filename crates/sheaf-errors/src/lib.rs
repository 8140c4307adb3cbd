use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use sheaf_tokenizer::Location;
use text_size::{TextRange, TextSize};

/// Malformed input at a specific source location.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{message} at {}:{}", location.line, location.column)]
pub struct SyntaxError {
    message: String,
    location: Location,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, location: Location) -> Self {
        Self { message: message.into(), location }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Range covering the character at the error offset, or an empty range at
    /// end of input.
    pub fn range(&self, text: &str) -> TextRange {
        let offset = (self.location.offset as usize).min(text.len());
        let len = text[offset..].chars().next().map_or(0, char::len_utf8);
        TextRange::at(TextSize::new(offset as u32), TextSize::new(len as u32))
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let message = Level::Error.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(self.range(text).into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

/// Programmer error in the parse configuration.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown context `{0}`")]
    UnknownContext(String),
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_at(offset: u32) -> SyntaxError {
        SyntaxError::new("Identifier is expected", Location { offset, line: 1, column: offset + 1 })
    }

    #[test]
    fn display_includes_position() {
        assert_eq!(error_at(4).to_string(), "Identifier is expected at 1:5");
    }

    #[test]
    fn range_spans_one_character() {
        let text = "a{é}";
        assert_eq!(error_at(2).range(text), TextRange::at(2.into(), 2.into()));
        assert_eq!(error_at(4).range(text), TextRange::at(4.into(), 1.into()));
        assert_eq!(error_at(5).range(text), TextRange::empty(5.into()));
    }

    #[test]
    fn render_points_at_offset() {
        let text = "a{b;}";
        let error = error_at(3);
        let rendered = error.render(&Renderer::plain(), "input.css", text).to_string();

        assert!(rendered.contains("error: Identifier is expected"));
        assert!(rendered.contains("input.css"));
        assert!(rendered.contains("here"));
    }

    #[test]
    fn config_error_message() {
        let error: Error = ConfigError::UnknownContext("rule".into()).into();
        assert_eq!(error.to_string(), "Unknown context `rule`");
    }
}
