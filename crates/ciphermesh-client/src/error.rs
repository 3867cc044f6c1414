//! Error types for the client crate.

use thiserror::Error;

use crate::keys::KeyLoadError;
use crate::network::NetworkError;

/// Errors that can occur while setting up or using a client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Key material could not be loaded. Fatal for the run.
    #[error("key load error: {0}")]
    Key(#[from] KeyLoadError),

    /// Network collaborator error, passed through unchanged.
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Core construction error.
    #[error("core error: {0}")]
    Core(#[from] ciphermesh_core::CoreError),

    /// Required configuration input is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
