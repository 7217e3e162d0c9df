use crate::template::ParseError;

/// Result alias that carries the custom [`MetronomeError`] type.
pub type Result<T> = std::result::Result<T, MetronomeError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum MetronomeError {
    /// Free-form message for conditions that have no dedicated variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Save data or configuration could not be encoded or decoded.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    /// User supplied template text was rejected by the parser.
    #[error("invalid speed template: {0}")]
    Template(#[from] ParseError),
    /// A persisted template no longer parses. The save file is damaged.
    #[error("saved template #{index} (`{name}`) is corrupt: {source}")]
    CorruptTemplate {
        index: usize,
        name: String,
        #[source]
        source: ParseError,
    },
    /// A template index did not address an entry of the library.
    #[error("no speed template at index {index} (library holds {len})")]
    UnknownTemplate { index: usize, len: usize },
    /// Staged removals would have popped the base surface.
    #[error("cannot pop {requested} surface(s) from a stack of {available}")]
    StackUnderflow { requested: usize, available: usize },
}

impl MetronomeError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for MetronomeError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for MetronomeError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
