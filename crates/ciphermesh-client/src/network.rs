//! The network collaborator trait.
//!
//! This is the boundary between the orchestration core and the actual
//! secure-computation network. The trait is intentionally opaque: the
//! core neither sees shares nor validates receipts itself; it only
//! threads a freshly paid receipt into each call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ciphermesh_core::{ClusterId, ProgramBinding, ProgramId, SecretSet, SecretValue, StoreId, UserId};
use ciphermesh_payments::PaymentReceipt;
use ciphermesh_perms::PermissionSet;

/// Errors surfaced by a network backend.
///
/// Passed through the core unchanged; the orchestrator never recovers
/// from these silently.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The receipt was minted for a different operation kind or cluster.
    #[error("receipt mismatch: {0}")]
    ReceiptMismatch(String),

    /// The receipt's nonce has already been consumed.
    #[error("receipt already spent: nonce {0}")]
    ReceiptSpent(u64),

    /// The caller lacks the required permission.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// No such store id or secret name.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport-level failure talking to cluster nodes.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Result of a compute call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeResult {
    /// Network-assigned identifier of the computation.
    pub compute_id: String,
}

/// The secure-computation network collaborator.
///
/// Every mutating call takes a [`PaymentReceipt`] by value: one receipt,
/// one call. The backend validates that the receipt's operation kind and
/// cluster match and that its nonce is unspent.
///
/// `caller` is the session-derived user identity on permission-checked
/// operations. A production backend authenticates it from the session's
/// key material; the in-tree [`crate::LocalCluster`] trusts the handed-in
/// id.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Store a permissioned secret set, bound to a program.
    ///
    /// Returns the store id under which the secrets (and their binding
    /// and permission set) now reside.
    async fn store_secrets(
        &self,
        cluster_id: &ClusterId,
        caller: &UserId,
        binding: &ProgramBinding,
        secrets: &SecretSet,
        permissions: &PermissionSet,
        receipt: PaymentReceipt,
    ) -> Result<StoreId>;

    /// Retrieve one named secret from a store.
    async fn retrieve(
        &self,
        cluster_id: &ClusterId,
        caller: &UserId,
        store_id: &StoreId,
        secret_name: &str,
        receipt: PaymentReceipt,
    ) -> Result<SecretValue>;

    /// Replace the permission set of a stored secret wholesale.
    async fn update_permissions(
        &self,
        cluster_id: &ClusterId,
        caller: &UserId,
        store_id: &StoreId,
        permissions: &PermissionSet,
        receipt: PaymentReceipt,
    ) -> Result<()>;

    /// Run a program over previously stored secrets.
    async fn compute(
        &self,
        cluster_id: &ClusterId,
        caller: &UserId,
        program_id: &ProgramId,
        binding: &ProgramBinding,
        store_ids: &[StoreId],
        receipt: PaymentReceipt,
    ) -> Result<ComputeResult>;
}
