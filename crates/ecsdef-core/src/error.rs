//! Error types for ecsdef
//!
//! All fallible operations return `Result<T, Error>`.
//! Every error aborts the enclosing call; nothing is retried at this layer.

use thiserror::Error;

/// ecsdef error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input text is not a well-formed container definitions document
    #[error("Decode error in {input}: {message}")]
    Decode {
        input: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// A well-formed record whose every field is at its zero value
    #[error("Validation error: invalid container definition supplied at index ({index})")]
    Validation { index: usize },

    /// Re-serialization failure (canonical data should always encode)
    #[error("Encode error: {0}")]
    Encode(String),
}

impl Error {
    /// Build a `Decode` error from a serde_json failure on the named input
    pub(crate) fn decode(input: &str, err: &serde_json::Error) -> Self {
        Error::Decode {
            input: input.to_string(),
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for ecsdef operations
pub type Result<T> = std::result::Result<T, Error>;
