//! End-to-end orchestration scenarios against recording doubles and the
//! in-memory cluster backend.

use std::sync::Arc;

use ciphermesh::{Coordinator, Error, PartyDescriptor};
use ciphermesh_client::LocalCluster;
use ciphermesh_core::{ClusterId, ProgramId, UserId};
use ciphermesh_payments::{LocalLedger, OperationKind, PaymentError, TokenAmount, Wallet};
use ciphermesh_testkit::{millionaires, NetworkCall, PartyFixture, RecordingNetwork, ScriptedLedger};

fn cluster() -> ClusterId {
    ClusterId::new("devnet").unwrap()
}

fn wallet() -> Wallet {
    Wallet::new("mesh1qtest", vec![0x42; 32])
}

fn prog() -> ProgramId {
    ProgramId::new("prog1").unwrap()
}

fn alice() -> UserId {
    UserId::new("alice_uid").unwrap()
}

fn descriptors(count: usize) -> Vec<PartyDescriptor> {
    millionaires(count)
        .into_iter()
        .map(|p| PartyDescriptor {
            party_name: p.party_name,
            secret_name: p.secret_name,
            secret_value: p.secret_value,
            user_key: p.fixture.user_key,
            node_key: p.fixture.node_key,
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────
// Scenario A: two parties store for a shared compute consumer
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn two_party_store_grants_consumer_compute_only() {
    let network = Arc::new(RecordingNetwork::new());
    let ledger = Arc::new(ScriptedLedger::new());
    let coordinator = Coordinator::new(Arc::clone(&network), Arc::clone(&ledger), wallet(), cluster());

    let parties = descriptors(2);
    let stored = coordinator
        .store_all(&parties, &prog(), &alice())
        .await
        .unwrap();

    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].party_name, "Bob");
    assert_eq!(stored[1].party_name, "Charlie");
    assert_ne!(stored[0].store_id, stored[1].store_id);

    let calls = network.calls();
    assert_eq!(calls.len(), 2);
    for (call, result) in calls.iter().zip(&stored) {
        let NetworkCall::StoreSecrets {
            caller,
            binding,
            permissions,
            receipt_operation,
            ..
        } = call
        else {
            panic!("expected a store call, got {call:?}");
        };

        // Receipt paid for exactly this kind of operation
        assert_eq!(*receipt_operation, OperationKind::StoreSecrets);

        // The party's own role is bound to its party id
        assert_eq!(
            binding.input_party(&result.party_name),
            Some(&result.party_id)
        );

        // Alice may compute prog1, nothing else; owner keeps the baseline
        assert!(permissions.is_compute_allowed(&alice(), &prog()));
        assert!(!permissions.is_retrieve_allowed(&alice()));
        assert!(permissions.is_retrieve_allowed(caller));
    }

    // The two owners deny each other
    let [first, second] = &calls[..] else { unreachable!() };
    let (NetworkCall::StoreSecrets { caller: bob, permissions: bob_perms, .. },
         NetworkCall::StoreSecrets { caller: charlie, permissions: charlie_perms, .. }) =
        (first, second)
    else {
        panic!("expected two store calls");
    };
    assert!(!bob_perms.is_retrieve_allowed(charlie));
    assert!(!charlie_perms.is_retrieve_allowed(bob));
}

#[tokio::test]
async fn fan_out_returns_one_result_per_party_in_order() {
    let network = Arc::new(RecordingNetwork::new());
    let ledger = Arc::new(ScriptedLedger::new());
    let coordinator = Coordinator::new(network, ledger, wallet(), cluster());

    let parties = descriptors(4);
    let names: Vec<_> = parties.iter().map(|p| p.party_name.clone()).collect();
    let stored = coordinator
        .store_all(&parties, &prog(), &alice())
        .await
        .unwrap();

    assert_eq!(stored.len(), 4);
    let result_names: Vec<_> = stored.iter().map(|s| s.party_name.clone()).collect();
    assert_eq!(result_names, names);

    let mut store_ids: Vec<_> = stored.iter().map(|s| s.store_id.clone()).collect();
    store_ids.dedup();
    assert_eq!(store_ids.len(), 4);

    let mut party_ids: Vec<_> = stored.iter().map(|s| s.party_id.clone()).collect();
    party_ids.sort();
    party_ids.dedup();
    assert_eq!(party_ids.len(), 4);
}

// ─────────────────────────────────────────────────────────────────────────
// Payment gating
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn every_network_call_presents_a_paid_receipt() {
    let network = Arc::new(RecordingNetwork::new());
    let ledger = Arc::new(ScriptedLedger::new());
    let coordinator = Coordinator::new(Arc::clone(&network), Arc::clone(&ledger), wallet(), cluster());

    coordinator
        .store_all(&descriptors(3), &prog(), &alice())
        .await
        .unwrap();

    let issued = ledger.issued_nonces();
    for call in network.calls() {
        let NetworkCall::StoreSecrets { receipt_nonce, .. } = call else {
            panic!("expected store calls only");
        };
        assert!(issued.contains(&receipt_nonce), "receipt was never paid for");
    }
    assert_eq!(ledger.quote_count(), 3);
    assert_eq!(ledger.pay_count(), 3);
}

#[tokio::test]
async fn failed_payment_means_no_network_call() {
    let network = Arc::new(RecordingNetwork::new());
    let ledger = Arc::new(ScriptedLedger::new().fail_pay_at(1));
    let coordinator = Coordinator::new(Arc::clone(&network), ledger, wallet(), cluster());

    let err = coordinator
        .store_all(&descriptors(1), &prog(), &alice())
        .await
        .unwrap_err();

    let Error::PartyFailed { party_name, completed, source } = err else {
        panic!("expected PartyFailed, got {err:?}");
    };
    assert_eq!(party_name, "Bob");
    assert!(completed.is_empty());
    assert!(matches!(
        *source,
        Error::Payment(PaymentError::PaymentFailed(_))
    ));
    assert_eq!(network.call_count(), 0);
}

// ─────────────────────────────────────────────────────────────────────────
// Failure mid-orchestration
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn quote_failure_at_party_two_aborts_before_party_three() {
    let network = Arc::new(RecordingNetwork::new());
    let ledger = Arc::new(ScriptedLedger::new().fail_quote_at(2));
    let coordinator = Coordinator::new(Arc::clone(&network), Arc::clone(&ledger), wallet(), cluster());

    let err = coordinator
        .store_all(&descriptors(3), &prog(), &alice())
        .await
        .unwrap_err();

    let Error::PartyFailed { party_name, completed, source } = err else {
        panic!("expected PartyFailed, got {err:?}");
    };
    assert_eq!(party_name, "Charlie");
    assert!(matches!(*source, Error::Payment(PaymentError::QuoteUnavailable(_))));

    // Party 1 keeps its result; party 3 was never attempted
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].party_name, "Bob");
    assert_eq!(network.call_count(), 1);
    assert_eq!(ledger.quote_count(), 2);
}

// ─────────────────────────────────────────────────────────────────────────
// Scenario B: revocation
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn revoke_submits_exactly_one_denying_update() {
    let network = Arc::new(RecordingNetwork::new());
    let ledger = Arc::new(ScriptedLedger::new());
    let coordinator = Coordinator::new(Arc::clone(&network), ledger, wallet(), cluster());

    let writer = PartyFixture::with_seed(1).session(Arc::clone(&network));
    let store_id = ciphermesh_core::StoreId::new("abc123").unwrap();
    let bob = UserId::new("bob_uid").unwrap();

    let returned = coordinator
        .revoke_retrieve(&writer, &store_id, &bob)
        .await
        .unwrap();
    assert_eq!(returned, store_id);

    let calls = network.calls();
    assert_eq!(calls.len(), 1);
    let NetworkCall::UpdatePermissions {
        caller,
        store_id: target,
        permissions,
        receipt_operation,
        ..
    } = &calls[0]
    else {
        panic!("expected an update_permissions call");
    };

    assert_eq!(caller, writer.user_id());
    assert_eq!(target, &store_id);
    assert_eq!(*receipt_operation, OperationKind::UpdatePermissions);
    assert!(!permissions.is_retrieve_allowed(&bob));
    assert!(permissions.is_retrieve_allowed(writer.user_id()));
}

// ─────────────────────────────────────────────────────────────────────────
// Full flow against the in-memory cluster
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn local_cluster_store_revoke_retrieve_compute() {
    let network = Arc::new(LocalCluster::new());
    let ledger = Arc::new(LocalLedger::new(TokenAmount(1_000)));
    let coordinator = Coordinator::new(Arc::clone(&network), Arc::clone(&ledger), wallet(), cluster());

    // Alice is a real session here so she can try to retrieve and compute
    let alice_fixture = PartyFixture::with_seed(100);
    let alice_session = alice_fixture.session(Arc::clone(&network));
    let alice_uid = alice_session.user_id().clone();

    let parties = descriptors(2);
    let stored = coordinator
        .store_all(&parties, &prog(), &alice_uid)
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);

    // Alice can compute across both stores...
    let result = coordinator
        .run_compute(&alice_session, &prog(), &stored)
        .await
        .unwrap();
    assert!(!result.compute_id.is_empty());

    // ...but cannot retrieve Bob's raw secret
    let err = ciphermesh_payments::execute_gated(
        OperationKind::Retrieve,
        coordinator.cluster_id(),
        ledger.as_ref(),
        &wallet(),
        |receipt| {
            alice_session.retrieve(
                coordinator.cluster_id(),
                &stored[0].store_id,
                "bob_salary",
                receipt,
            )
        },
    )
    .await;
    assert!(err.is_err());

    // Bob revokes alice's compute access by resetting to his default set
    let bob_session = {
        let p = millionaires(2).remove(0);
        p.fixture.session(Arc::clone(&network))
    };
    coordinator
        .revoke_retrieve(&bob_session, &stored[0].store_id, &alice_uid)
        .await
        .unwrap();

    // The stored set is now owner-only: alice's compute grant is gone too
    let current = network.permissions_of(&stored[0].store_id).unwrap();
    assert!(!current.is_compute_allowed(&alice_uid, &prog()));
    assert!(current.is_retrieve_allowed(bob_session.user_id()));

    let err = coordinator
        .run_compute(&alice_session, &prog(), &stored)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}
