//! Error types for rewriting operations

use rowan::TextRange;
use thiserror::Error;

/// Main error type for rewriting operations
#[derive(Debug, Error)]
pub enum RejigError {
    /// Two edits with intersecting ranges reached the same ledger. This is a
    /// caller-contract violation, not a recoverable runtime condition.
    #[error("overlapping edits: {first:?} intersects {second:?}")]
    Overlap { first: TextRange, second: TextRange },

    /// An edit range points outside the source buffer being rendered
    #[error("edit range {range:?} is out of bounds for a buffer of length {len}")]
    EditOutOfBounds { range: TextRange, len: usize },

    /// The dispatch layer received an action id that the current
    /// applicability state never advertised
    #[error("invalid action '{action}' for refactor '{refactor}'")]
    InvalidAction { refactor: String, action: String },

    /// No provider is registered under the requested refactor name
    #[error("unknown refactor '{0}'")]
    UnknownRefactor(String),

    /// Source failed to parse
    #[error("parse error: {message}")]
    Parse { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("internal error: {message}")]
    Internal { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Overlap,
    Edit,
    Dispatch,
    Parse,
    Io,
    Internal,
}

impl RejigError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RejigError::Overlap { .. } => ErrorKind::Overlap,
            RejigError::EditOutOfBounds { .. } => ErrorKind::Edit,
            RejigError::InvalidAction { .. } | RejigError::UnknownRefactor(_) => {
                ErrorKind::Dispatch
            }
            RejigError::Parse { .. } => ErrorKind::Parse,
            RejigError::Io { .. } => ErrorKind::Io,
            RejigError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Create an overlap error naming both conflicting ranges
    pub fn overlap(first: TextRange, second: TextRange) -> Self {
        Self::Overlap { first, second }
    }

    /// Create an invalid-action error
    pub fn invalid_action(refactor: impl Into<String>, action: impl Into<String>) -> Self {
        Self::InvalidAction {
            refactor: refactor.into(),
            action: action.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<std::path::PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
