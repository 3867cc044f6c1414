//! Party sessions: one participant's authenticated network handle.
//!
//! A session derives its identities deterministically from the supplied
//! key material and delegates all network calls to the underlying
//! collaborator, stamping them with the session's user id. Sessions live
//! for the duration of a run and are never persisted.

use std::sync::Arc;

use ciphermesh_core::{
    ClusterId, PartyId, ProgramBinding, ProgramId, SecretSet, SecretValue, StoreId, UserId,
};
use ciphermesh_payments::PaymentReceipt;
use ciphermesh_perms::PermissionSet;

use crate::keys::{NodeKey, UserKey};
use crate::network::{ComputeResult, NetworkClient, Result};

/// Domain separators for identity derivation.
const USER_ID_CONTEXT: &str = "ciphermesh/user-id/v1";
const PARTY_ID_CONTEXT: &str = "ciphermesh/party-id/v1";

/// One participant's handle to the network.
pub struct PartySession<N> {
    user_id: UserId,
    party_id: PartyId,
    network: Arc<N>,
}

impl<N: NetworkClient> PartySession<N> {
    /// Open a session from key material.
    ///
    /// `user_id` is derived from the user key alone, so it is stable
    /// across nodes; `party_id` mixes in the node key, so the same user
    /// appears as distinct parties on distinct nodes.
    pub fn open(user_key: &UserKey, node_key: &NodeKey, network: Arc<N>) -> Self {
        let user_pk = user_key.public_key_bytes();
        let user_hash = blake3::derive_key(USER_ID_CONTEXT, &user_pk);
        let user_id = UserId::new(hex::encode(user_hash))
            .unwrap_or_else(|_| unreachable!("hex output is always a valid id"));

        let mut material = Vec::with_capacity(64);
        material.extend_from_slice(&user_pk);
        material.extend_from_slice(&node_key.public_key_bytes());
        let party_hash = blake3::derive_key(PARTY_ID_CONTEXT, &material);
        let party_id = PartyId::new(hex::encode(party_hash))
            .unwrap_or_else(|_| unreachable!("hex output is always a valid id"));

        Self {
            user_id,
            party_id,
            network,
        }
    }

    /// The stable user identity derived from the user key.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The party identity derived from user and node keys.
    pub fn party_id(&self) -> &PartyId {
        &self.party_id
    }

    /// The underlying network collaborator.
    pub fn network(&self) -> &Arc<N> {
        &self.network
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Delegation
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a permissioned secret set as this session's user.
    pub async fn store_secrets(
        &self,
        cluster_id: &ClusterId,
        binding: &ProgramBinding,
        secrets: &SecretSet,
        permissions: &PermissionSet,
        receipt: PaymentReceipt,
    ) -> Result<StoreId> {
        self.network
            .store_secrets(cluster_id, &self.user_id, binding, secrets, permissions, receipt)
            .await
    }

    /// Retrieve one named secret as this session's user.
    pub async fn retrieve(
        &self,
        cluster_id: &ClusterId,
        store_id: &StoreId,
        secret_name: &str,
        receipt: PaymentReceipt,
    ) -> Result<SecretValue> {
        self.network
            .retrieve(cluster_id, &self.user_id, store_id, secret_name, receipt)
            .await
    }

    /// Replace a store's permission set as this session's user.
    pub async fn update_permissions(
        &self,
        cluster_id: &ClusterId,
        store_id: &StoreId,
        permissions: &PermissionSet,
        receipt: PaymentReceipt,
    ) -> Result<()> {
        self.network
            .update_permissions(cluster_id, &self.user_id, store_id, permissions, receipt)
            .await
    }

    /// Run a program as this session's user.
    pub async fn compute(
        &self,
        cluster_id: &ClusterId,
        program_id: &ProgramId,
        binding: &ProgramBinding,
        store_ids: &[StoreId],
        receipt: PaymentReceipt,
    ) -> Result<ComputeResult> {
        self.network
            .compute(cluster_id, &self.user_id, program_id, binding, store_ids, receipt)
            .await
    }
}

impl<N> std::fmt::Debug for PartySession<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartySession")
            .field("user_id", &self.user_id)
            .field("party_id", &self.party_id)
            .finish()
    }
}
