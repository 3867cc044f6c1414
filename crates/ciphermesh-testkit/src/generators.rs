//! Proptest generators for property-based testing.

use proptest::prelude::*;

use ciphermesh_core::{ProgramId, SecretValue, UserId};
use ciphermesh_payments::OperationKind;
use ciphermesh_perms::PermissionSet;

/// Generate a valid user id.
pub fn user_id() -> impl Strategy<Value = UserId> {
    "[a-z0-9][a-z0-9_]{0,31}".prop_map(|s| UserId::new(s).unwrap())
}

/// Generate a valid program id.
pub fn program_id() -> impl Strategy<Value = ProgramId> {
    "[a-z0-9][a-z0-9/_-]{0,31}".prop_map(|s| ProgramId::new(s).unwrap())
}

/// Generate an integer secret value.
pub fn secret_value() -> impl Strategy<Value = SecretValue> {
    any::<i64>().prop_map(SecretValue::Integer)
}

/// Generate an operation kind.
pub fn operation_kind() -> impl Strategy<Value = OperationKind> {
    prop_oneof![
        Just(OperationKind::StoreSecrets),
        Just(OperationKind::UpdatePermissions),
        Just(OperationKind::Retrieve),
        Just(OperationKind::Compute),
        Just(OperationKind::StoreProgram),
    ]
}

/// Generate a permission set with random compute and retrieve grants.
pub fn permission_set() -> impl Strategy<Value = PermissionSet> {
    (
        user_id(),
        prop::collection::vec((user_id(), program_id()), 0..8),
        prop::collection::vec(user_id(), 0..4),
    )
        .prop_map(|(owner, compute_grants, readers)| {
            let mut set = PermissionSet::default_for_user(owner);
            for (user, program) in compute_grants {
                set.grant_compute(user, program);
            }
            for reader in readers {
                set.allow_retrieve(reader);
            }
            set
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn prop_generated_sets_keep_owner_baseline(set in permission_set()) {
            let owner = set.owner().clone();
            prop_assert!(set.is_retrieve_allowed(&owner));
            prop_assert!(set.is_update_allowed(&owner));
            prop_assert!(set.is_delete_allowed(&owner));
        }

        #[test]
        fn prop_permission_set_cbor_roundtrip(set in permission_set()) {
            let bytes = set.to_bytes().unwrap();
            let recovered = PermissionSet::from_bytes(&bytes).unwrap();
            prop_assert_eq!(set, recovered);
        }
    }
}
