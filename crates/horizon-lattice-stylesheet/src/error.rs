//! Error types for rule sinks and preprocessing.

/// Result type alias for stylesheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preprocessing or delivering rules.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Style body could not be parsed.
    #[error("CSS parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: u32,
        column: u32,
    },

    /// A rule was inserted before the sink was injected.
    #[error("Stylesheet has not been injected")]
    NotInjected,

    /// The sink was injected twice without a flush in between.
    #[error("Stylesheet has already been injected")]
    AlreadyInjected,

    /// The sink rejected a rule.
    #[error("Failed to insert rule '{rule}': {message}")]
    Sink { rule: String, message: String },

    /// A plugin failed while transforming a rule.
    #[error("Plugin error: {0}")]
    Plugin(String),
}

impl Error {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a sink error for a rejected rule.
    pub fn sink(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sink {
            rule: rule.into(),
            message: message.into(),
        }
    }
}
