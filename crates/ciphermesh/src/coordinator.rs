//! The Coordinator: drives parties through store, revoke, and compute.
//!
//! One coordinator owns the collaborator handles (network, ledger,
//! wallet, cluster id) for a run. All mutating network calls go through
//! [`ciphermesh_payments::execute_gated`], so payment gating cannot be
//! bypassed from here.

use std::sync::Arc;

use ciphermesh_client::{ComputeResult, NetworkClient, PartySession};
use ciphermesh_client::keys::{NodeKey, UserKey};
use ciphermesh_core::{ClusterId, PartyId, ProgramBinding, ProgramId, SecretSet, StoreId, UserId};
use ciphermesh_payments::{execute_gated, LedgerClient, OperationKind, Wallet};
use ciphermesh_perms::{PermissionSet, PermsError};

use crate::error::{Error, Result};

/// One participant in a multi-party store run.
#[derive(Debug, Clone)]
pub struct PartyDescriptor {
    /// The role name the program binds this party's input slot to.
    pub party_name: String,
    /// Logical name of the contributed secret.
    pub secret_name: String,
    /// The secret payload.
    pub secret_value: i64,
    /// Key material for this party's session.
    pub user_key: UserKey,
    pub node_key: NodeKey,
}

/// Output of one party's completed store sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyStore {
    pub party_name: String,
    pub party_id: PartyId,
    pub store_id: StoreId,
}

/// Orchestrates payment-gated stores, permission updates, and compute
/// across a fixed set of parties.
pub struct Coordinator<N, L> {
    network: Arc<N>,
    ledger: Arc<L>,
    wallet: Wallet,
    cluster_id: ClusterId,
}

impl<N: NetworkClient, L: LedgerClient> Coordinator<N, L> {
    /// Create a coordinator for one cluster.
    pub fn new(network: Arc<N>, ledger: Arc<L>, wallet: Wallet, cluster_id: ClusterId) -> Self {
        Self {
            network,
            ledger,
            wallet,
            cluster_id,
        }
    }

    /// The cluster this coordinator addresses.
    pub fn cluster_id(&self) -> &ClusterId {
        &self.cluster_id
    }

    /// Open a session on this coordinator's network handle.
    pub fn open_session(&self, user_key: &UserKey, node_key: &NodeKey) -> PartySession<N> {
        PartySession::open(user_key, node_key, Arc::clone(&self.network))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Multi-Party Store
    // ─────────────────────────────────────────────────────────────────────────

    /// Store one secret per party so that `consumer` can later run
    /// `program_id` over all of them.
    ///
    /// Parties are processed sequentially in input order; each sequence
    /// is: open session, build secret set, bind the party's role to the
    /// program, grant the consumer compute permission, then store behind
    /// a payment gate.
    ///
    /// Aborts on the first failing party. Secrets stored before the
    /// failure stay on the network (their results travel in the error);
    /// cleanup is an operational concern, not a rollback here.
    pub async fn store_all(
        &self,
        parties: &[PartyDescriptor],
        program_id: &ProgramId,
        consumer: &UserId,
    ) -> Result<Vec<PartyStore>> {
        let mut stored = Vec::with_capacity(parties.len());

        for descriptor in parties {
            match self.store_one(descriptor, program_id, consumer).await {
                Ok(result) => {
                    tracing::info!(
                        party = %result.party_name,
                        store_id = %result.store_id,
                        "stored party secret"
                    );
                    stored.push(result);
                }
                Err(source) => {
                    tracing::warn!(
                        party = %descriptor.party_name,
                        error = %source,
                        "aborting multi-party store"
                    );
                    return Err(Error::PartyFailed {
                        party_name: descriptor.party_name.clone(),
                        completed: stored,
                        source: Box::new(source),
                    });
                }
            }
        }

        Ok(stored)
    }

    /// One party's full store sequence.
    async fn store_one(
        &self,
        descriptor: &PartyDescriptor,
        program_id: &ProgramId,
        consumer: &UserId,
    ) -> Result<PartyStore> {
        let session = self.open_session(&descriptor.user_key, &descriptor.node_key);

        let secrets = SecretSet::single(&descriptor.secret_name, descriptor.secret_value)?;

        let mut binding = ProgramBinding::new(program_id.clone());
        binding.add_input_party(&descriptor.party_name, session.party_id().clone())?;

        let mut permissions = PermissionSet::default_for_user(session.user_id().clone());
        permissions.grant_compute(consumer.clone(), program_id.clone());

        let store_id = execute_gated(
            OperationKind::StoreSecrets,
            &self.cluster_id,
            self.ledger.as_ref(),
            &self.wallet,
            |receipt| session.store_secrets(&self.cluster_id, &binding, &secrets, &permissions, receipt),
        )
        .await?;

        Ok(PartyStore {
            party_name: descriptor.party_name.clone(),
            party_id: session.party_id().clone(),
            store_id,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Permission Revocation
    // ─────────────────────────────────────────────────────────────────────────

    /// Revoke a user's retrieve access to a stored secret.
    ///
    /// Rights are not patchable server-side, so revocation submits a
    /// fresh default set for the writer — which by construction denies
    /// everyone but the owner. Every other previously granted right on
    /// this store is replaced along with it.
    ///
    /// The freshly built set is checked locally before submission; a set
    /// that still allows the revoked user signals an internal defect and
    /// fails with [`PermsError::InvalidPermissionState`].
    pub async fn revoke_retrieve(
        &self,
        writer: &PartySession<N>,
        store_id: &StoreId,
        revoked_user_id: &UserId,
    ) -> Result<StoreId> {
        let permissions = PermissionSet::default_for_user(writer.user_id().clone());

        if permissions.is_retrieve_allowed(revoked_user_id) {
            return Err(PermsError::InvalidPermissionState(format!(
                "default set for {} still allows {} to retrieve",
                writer.user_id(),
                revoked_user_id
            ))
            .into());
        }

        execute_gated(
            OperationKind::UpdatePermissions,
            &self.cluster_id,
            self.ledger.as_ref(),
            &self.wallet,
            |receipt| writer.update_permissions(&self.cluster_id, store_id, &permissions, receipt),
        )
        .await?;

        tracing::info!(%store_id, revoked = %revoked_user_id, "reset permissions to owner default");
        Ok(store_id.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Compute
    // ─────────────────────────────────────────────────────────────────────────

    /// Run a program over previously stored secrets.
    ///
    /// `stored` is the output of [`Coordinator::store_all`], consumed
    /// verbatim: every party's store id is addressed, and the compute
    /// binding re-registers each party's role.
    pub async fn run_compute(
        &self,
        runner: &PartySession<N>,
        program_id: &ProgramId,
        stored: &[PartyStore],
    ) -> Result<ComputeResult> {
        let mut binding = ProgramBinding::new(program_id.clone());
        for entry in stored {
            binding.add_input_party(&entry.party_name, entry.party_id.clone())?;
        }
        let store_ids: Vec<StoreId> = stored.iter().map(|s| s.store_id.clone()).collect();

        let result = execute_gated(
            OperationKind::Compute,
            &self.cluster_id,
            self.ledger.as_ref(),
            &self.wallet,
            |receipt| runner.compute(&self.cluster_id, program_id, &binding, &store_ids, receipt),
        )
        .await?;

        tracing::info!(compute_id = %result.compute_id, "compute accepted");
        Ok(result)
    }
}
