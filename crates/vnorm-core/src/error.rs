//! Error types for vnorm
//!
//! Normalization itself is total and never fails. Errors only arise at the
//! edges: decoding render output from JSON and reading it from disk.

use thiserror::Error;

/// vnorm error types
#[derive(Debug, Error)]
pub enum Error {
    /// Render output could not be decoded into child values
    #[error("Decode error at {path}: {message}")]
    Decode { path: String, message: String },

    /// Reading or writing render output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode {
            path: format!("line {}, column {}", e.line(), e.column()),
            message: e.to_string(),
        }
    }
}

/// Result type alias for vnorm operations
pub type Result<T> = std::result::Result<T, Error>;
