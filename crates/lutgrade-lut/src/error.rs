//! LUT error types.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur during LUT loading and parsing.
#[derive(Debug, Error)]
pub enum LutError {
    /// The input stream contained no data at all.
    #[error("empty LUT input")]
    EmptyInput,

    /// Parse error when decoding LUT streams.
    #[error("parse error: {0}")]
    ParseError(String),

    /// Entry count does not form a valid N x N x N cube.
    #[error("invalid LUT size: {0}")]
    InvalidSize(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
