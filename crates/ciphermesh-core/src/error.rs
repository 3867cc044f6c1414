//! Error types for ciphermesh core data structures.

use thiserror::Error;

/// Errors raised while constructing or encoding core values.
///
/// These are all local construction errors; they are never retried.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid program reference: {0}")]
    InvalidProgramReference(String),

    #[error("malformed secret: {0}")]
    MalformedSecret(String),

    #[error("party {0:?} is already bound")]
    DuplicateParty(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
