//! Error types for the orchestration facade.

use thiserror::Error;

use ciphermesh_client::{KeyLoadError, NetworkError};
use ciphermesh_core::CoreError;
use ciphermesh_payments::{GatedError, PaymentError};
use ciphermesh_perms::PermsError;

use crate::coordinator::PartyStore;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum Error {
    /// Core construction error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Permission error.
    #[error("permission error: {0}")]
    Perms(#[from] PermsError),

    /// Quote or payment failure.
    #[error("payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Network collaborator failure, passed through unchanged.
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Key material failure. Fatal for the run.
    #[error("key load error: {0}")]
    Key(#[from] KeyLoadError),

    /// One party's store sequence failed; the run was aborted.
    ///
    /// `completed` holds the results of parties that finished strictly
    /// before the failure. Their secrets remain on the network; there is
    /// no compensating rollback.
    #[error("party {party_name} failed: {source}")]
    PartyFailed {
        party_name: String,
        completed: Vec<PartyStore>,
        #[source]
        source: Box<Error>,
    },
}

impl From<GatedError<NetworkError>> for Error {
    fn from(e: GatedError<NetworkError>) -> Self {
        match e {
            GatedError::Payment(e) => Error::Payment(e),
            GatedError::Operation(e) => Error::Network(e),
        }
    }
}

/// Result type for orchestration operations.
pub type Result<T> = std::result::Result<T, Error>;
