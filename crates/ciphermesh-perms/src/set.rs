//! The permission set: per-secret access rights.
//!
//! Modeled as a tagged struct with explicit fields rather than an open
//! mapping, so the default-deny invariant is statically visible: a user
//! absent from a rights set has no rights.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use ciphermesh_core::{ProgramId, UserId};

use crate::error::{PermsError, Result};

/// Access-control object attached to one stored secret.
///
/// The owner (the user that constructed the set) always holds retrieve,
/// update, and delete rights. Everyone else defaults to deny and gains
/// rights only through explicit grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    owner: UserId,
    retrieve: BTreeSet<UserId>,
    update: BTreeSet<UserId>,
    delete: BTreeSet<UserId>,
    compute: BTreeMap<UserId, BTreeSet<ProgramId>>,
}

impl PermissionSet {
    /// Create the default set for an owner: full rights for the owner,
    /// nothing for anyone else.
    pub fn default_for_user(owner: UserId) -> Self {
        let mut retrieve = BTreeSet::new();
        retrieve.insert(owner.clone());
        let mut update = BTreeSet::new();
        update.insert(owner.clone());
        let mut delete = BTreeSet::new();
        delete.insert(owner.clone());

        Self {
            owner,
            retrieve,
            update,
            delete,
            compute: BTreeMap::new(),
        }
    }

    /// The user that created this set.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Grants
    // ─────────────────────────────────────────────────────────────────────────

    /// Allow a user to run a specific program against this secret.
    ///
    /// Idempotent: granting the same pair twice is a no-op.
    pub fn grant_compute(&mut self, user_id: UserId, program_id: ProgramId) {
        self.compute.entry(user_id).or_default().insert(program_id);
    }

    /// Bulk compute grant: for each user, allow every listed program.
    pub fn add_compute_permissions(
        &mut self,
        grants: impl IntoIterator<Item = (UserId, BTreeSet<ProgramId>)>,
    ) {
        for (user_id, programs) in grants {
            self.compute.entry(user_id).or_default().extend(programs);
        }
    }

    /// Allow a non-owner user to retrieve this secret.
    pub fn allow_retrieve(&mut self, user_id: UserId) {
        self.retrieve.insert(user_id);
    }

    /// Allow a non-owner user to update this secret.
    pub fn allow_update(&mut self, user_id: UserId) {
        self.update.insert(user_id);
    }

    /// Allow a non-owner user to delete this secret.
    pub fn allow_delete(&mut self, user_id: UserId) {
        self.delete.insert(user_id);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Predicates
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether a user may retrieve this secret. Owner is always allowed.
    pub fn is_retrieve_allowed(&self, user_id: &UserId) -> bool {
        user_id == &self.owner || self.retrieve.contains(user_id)
    }

    /// Whether a user may update this secret. Owner is always allowed.
    pub fn is_update_allowed(&self, user_id: &UserId) -> bool {
        user_id == &self.owner || self.update.contains(user_id)
    }

    /// Whether a user may delete this secret. Owner is always allowed.
    pub fn is_delete_allowed(&self, user_id: &UserId) -> bool {
        user_id == &self.owner || self.delete.contains(user_id)
    }

    /// Whether a user may run the given program against this secret.
    ///
    /// Compute rights are per-program; even the owner needs an explicit
    /// grant to compute.
    pub fn is_compute_allowed(&self, user_id: &UserId, program_id: &ProgramId) -> bool {
        self.compute
            .get(user_id)
            .is_some_and(|programs| programs.contains(program_id))
    }

    /// Programs a user may run against this secret.
    pub fn compute_programs(&self, user_id: &UserId) -> Option<&BTreeSet<ProgramId>> {
        self.compute.get(user_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derivation
    // ─────────────────────────────────────────────────────────────────────────

    /// A copy of this set in which the named user holds no retrieve right.
    ///
    /// The owner's baseline cannot be removed this way; asking for a copy
    /// without the owner's retrieve right returns the set unchanged, since
    /// the baseline is a construction invariant.
    pub fn without_retrieve(&self, user_id: &UserId) -> Self {
        let mut copy = self.clone();
        copy.retrieve.remove(user_id);
        copy
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Encoding
    // ─────────────────────────────────────────────────────────────────────────

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| PermsError::SerializationError(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e: ciborium::de::Error<std::io::Error>| {
            PermsError::SerializationError(e.to_string())
        })
    }
}
