//! Protocol error types.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced by the transport and line codec.
///
/// Malformed but syntactically framed lines are not errors; they parse to
/// [`crate::ServerEvent::Ignored`] instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// An I/O error on the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line exceeded the protocol's length limit.
    #[error("line too long: {actual} bytes (limit {limit})")]
    LineTooLong {
        /// Observed length in bytes, delimiter included.
        actual: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// A received line was not valid UTF-8.
    #[error("invalid UTF-8 at byte {byte_pos}: {details}")]
    InvalidUtf8 {
        /// Offset of the first invalid byte.
        byte_pos: usize,
        /// Description of the encoding failure.
        details: String,
    },
}
