//! In-memory implementation of the network collaborator.
//!
//! `LocalCluster` stands in for a remote cluster in tests and the devnet
//! CLI. It has the same observable contract as a real backend: receipts
//! are checked for operation kind, cluster, and single use; retrieval,
//! permission updates, and compute are gated on the stored permission
//! set. All data is lost when the cluster is dropped.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use ciphermesh_core::{
    ClusterId, ProgramBinding, ProgramId, SecretSet, SecretValue, StoreId, UserId,
};
use ciphermesh_payments::{OperationKind, PaymentReceipt};
use ciphermesh_perms::PermissionSet;

use crate::network::{ComputeResult, NetworkClient, NetworkError, Result};

/// In-memory cluster backend. Thread-safe via RwLock.
pub struct LocalCluster {
    inner: RwLock<LocalClusterInner>,
}

struct LocalClusterInner {
    /// Stored objects indexed by store id.
    objects: HashMap<StoreId, StoredObject>,

    /// Consumed receipt nonces.
    spent_nonces: HashSet<u64>,

    /// Monotonic counter feeding store id derivation.
    next_object: u64,

    /// Monotonic counter feeding compute id derivation.
    next_compute: u64,
}

struct StoredObject {
    secrets: SecretSet,
    binding: ProgramBinding,
    permissions: PermissionSet,
}

impl LocalCluster {
    /// Create a new empty cluster.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LocalClusterInner {
                objects: HashMap::new(),
                spent_nonces: HashSet::new(),
                next_object: 1,
                next_compute: 1,
            }),
        }
    }

    /// The permission set currently attached to a store, if any.
    ///
    /// Inspection hook for tests; a real backend offers no such view.
    pub fn permissions_of(&self, store_id: &StoreId) -> Option<PermissionSet> {
        let inner = self.inner.read().unwrap();
        inner.objects.get(store_id).map(|o| o.permissions.clone())
    }
}

impl Default for LocalCluster {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalClusterInner {
    /// Validate and consume a receipt for the expected operation.
    fn spend_receipt(
        &mut self,
        receipt: &PaymentReceipt,
        expected: OperationKind,
        cluster_id: &ClusterId,
    ) -> Result<()> {
        if receipt.operation() != expected {
            return Err(NetworkError::ReceiptMismatch(format!(
                "receipt pays for {}, call is {}",
                receipt.operation(),
                expected
            )));
        }
        if receipt.cluster_id() != cluster_id {
            return Err(NetworkError::ReceiptMismatch(format!(
                "receipt scoped to cluster {}, call addresses {}",
                receipt.cluster_id(),
                cluster_id
            )));
        }
        if !self.spent_nonces.insert(receipt.nonce()) {
            return Err(NetworkError::ReceiptSpent(receipt.nonce()));
        }
        Ok(())
    }

    fn derive_store_id(&mut self) -> StoreId {
        let n = self.next_object;
        self.next_object += 1;
        let digest = blake3::hash(&n.to_le_bytes());
        StoreId::new(hex::encode(&digest.as_bytes()[..16]))
            .unwrap_or_else(|_| unreachable!("hex output is always a valid id"))
    }
}

#[async_trait]
impl NetworkClient for LocalCluster {
    async fn store_secrets(
        &self,
        cluster_id: &ClusterId,
        _caller: &UserId,
        binding: &ProgramBinding,
        secrets: &SecretSet,
        permissions: &PermissionSet,
        receipt: PaymentReceipt,
    ) -> Result<StoreId> {
        let mut inner = self.inner.write().unwrap();
        inner.spend_receipt(&receipt, OperationKind::StoreSecrets, cluster_id)?;

        let store_id = inner.derive_store_id();
        inner.objects.insert(
            store_id.clone(),
            StoredObject {
                secrets: secrets.clone(),
                binding: binding.clone(),
                permissions: permissions.clone(),
            },
        );
        tracing::debug!(%store_id, secrets = secrets.len(), "stored secret set");

        Ok(store_id)
    }

    async fn retrieve(
        &self,
        cluster_id: &ClusterId,
        caller: &UserId,
        store_id: &StoreId,
        secret_name: &str,
        receipt: PaymentReceipt,
    ) -> Result<SecretValue> {
        let mut inner = self.inner.write().unwrap();
        inner.spend_receipt(&receipt, OperationKind::Retrieve, cluster_id)?;

        let object = inner
            .objects
            .get(store_id)
            .ok_or_else(|| NetworkError::NotFound(format!("store {store_id}")))?;

        if !object.permissions.is_retrieve_allowed(caller) {
            return Err(NetworkError::Unauthorized(format!(
                "user {caller} may not retrieve store {store_id}"
            )));
        }

        object
            .secrets
            .get(secret_name)
            .cloned()
            .ok_or_else(|| NetworkError::NotFound(format!("secret {secret_name:?} in {store_id}")))
    }

    async fn update_permissions(
        &self,
        cluster_id: &ClusterId,
        caller: &UserId,
        store_id: &StoreId,
        permissions: &PermissionSet,
        receipt: PaymentReceipt,
    ) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.spend_receipt(&receipt, OperationKind::UpdatePermissions, cluster_id)?;

        let object = inner
            .objects
            .get_mut(store_id)
            .ok_or_else(|| NetworkError::NotFound(format!("store {store_id}")))?;

        if !object.permissions.is_update_allowed(caller) {
            return Err(NetworkError::Unauthorized(format!(
                "user {caller} may not update store {store_id}"
            )));
        }

        // Wholesale replacement: rights never merge
        object.permissions = permissions.clone();
        tracing::debug!(%store_id, "replaced permission set");
        Ok(())
    }

    async fn compute(
        &self,
        cluster_id: &ClusterId,
        caller: &UserId,
        program_id: &ProgramId,
        _binding: &ProgramBinding,
        store_ids: &[StoreId],
        receipt: PaymentReceipt,
    ) -> Result<ComputeResult> {
        let mut inner = self.inner.write().unwrap();
        inner.spend_receipt(&receipt, OperationKind::Compute, cluster_id)?;

        for store_id in store_ids {
            let object = inner
                .objects
                .get(store_id)
                .ok_or_else(|| NetworkError::NotFound(format!("store {store_id}")))?;

            if !object.permissions.is_compute_allowed(caller, program_id) {
                return Err(NetworkError::Unauthorized(format!(
                    "user {caller} may not run {program_id} over store {store_id}"
                )));
            }
        }

        let n = inner.next_compute;
        inner.next_compute += 1;
        Ok(ComputeResult {
            compute_id: format!("compute-{n:08x}"),
        })
    }
}
