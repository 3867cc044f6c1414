//! Recording doubles for the network and ledger collaborators.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use ciphermesh_client::{ComputeResult, NetworkClient, NetworkError};
use ciphermesh_core::{
    ClusterId, ProgramBinding, ProgramId, SecretSet, SecretValue, StoreId, UserId,
};
use ciphermesh_payments::{
    LedgerClient, OperationKind, PaymentError, PaymentReceipt, PriceQuote, TokenAmount, Wallet,
};
use ciphermesh_perms::PermissionSet;

/// One observed network call, with snapshots of what was submitted.
///
/// Receipts are consumed by the call, so only their observable fields
/// (operation kind and nonce) are recorded.
#[derive(Debug, Clone)]
pub enum NetworkCall {
    StoreSecrets {
        caller: UserId,
        binding: ProgramBinding,
        secrets: SecretSet,
        permissions: PermissionSet,
        receipt_operation: OperationKind,
        receipt_nonce: u64,
    },
    UpdatePermissions {
        caller: UserId,
        store_id: StoreId,
        permissions: PermissionSet,
        receipt_operation: OperationKind,
        receipt_nonce: u64,
    },
    Retrieve {
        caller: UserId,
        store_id: StoreId,
        secret_name: String,
        receipt_operation: OperationKind,
        receipt_nonce: u64,
    },
    Compute {
        caller: UserId,
        program_id: ProgramId,
        store_ids: Vec<StoreId>,
        receipt_operation: OperationKind,
        receipt_nonce: u64,
    },
}

/// Network double that records every call and fabricates successful
/// responses with sequential store ids.
#[derive(Default)]
pub struct RecordingNetwork {
    calls: Mutex<Vec<NetworkCall>>,
    next_store: AtomicU64,
}

impl RecordingNetwork {
    /// Create a fresh recording network.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_store: AtomicU64::new(1),
        }
    }

    /// All calls observed so far, in order.
    pub fn calls(&self) -> Vec<NetworkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls observed so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl NetworkClient for RecordingNetwork {
    async fn store_secrets(
        &self,
        _cluster_id: &ClusterId,
        caller: &UserId,
        binding: &ProgramBinding,
        secrets: &SecretSet,
        permissions: &PermissionSet,
        receipt: PaymentReceipt,
    ) -> Result<StoreId, NetworkError> {
        self.calls.lock().unwrap().push(NetworkCall::StoreSecrets {
            caller: caller.clone(),
            binding: binding.clone(),
            secrets: secrets.clone(),
            permissions: permissions.clone(),
            receipt_operation: receipt.operation(),
            receipt_nonce: receipt.nonce(),
        });

        let n = self.next_store.fetch_add(1, Ordering::SeqCst);
        Ok(StoreId::new(format!("store-{n:04}")).unwrap())
    }

    async fn retrieve(
        &self,
        _cluster_id: &ClusterId,
        caller: &UserId,
        store_id: &StoreId,
        secret_name: &str,
        receipt: PaymentReceipt,
    ) -> Result<SecretValue, NetworkError> {
        self.calls.lock().unwrap().push(NetworkCall::Retrieve {
            caller: caller.clone(),
            store_id: store_id.clone(),
            secret_name: secret_name.to_string(),
            receipt_operation: receipt.operation(),
            receipt_nonce: receipt.nonce(),
        });

        Ok(SecretValue::Integer(0))
    }

    async fn update_permissions(
        &self,
        _cluster_id: &ClusterId,
        caller: &UserId,
        store_id: &StoreId,
        permissions: &PermissionSet,
        receipt: PaymentReceipt,
    ) -> Result<(), NetworkError> {
        self.calls
            .lock()
            .unwrap()
            .push(NetworkCall::UpdatePermissions {
                caller: caller.clone(),
                store_id: store_id.clone(),
                permissions: permissions.clone(),
                receipt_operation: receipt.operation(),
                receipt_nonce: receipt.nonce(),
            });

        Ok(())
    }

    async fn compute(
        &self,
        _cluster_id: &ClusterId,
        caller: &UserId,
        program_id: &ProgramId,
        _binding: &ProgramBinding,
        store_ids: &[StoreId],
        receipt: PaymentReceipt,
    ) -> Result<ComputeResult, NetworkError> {
        self.calls.lock().unwrap().push(NetworkCall::Compute {
            caller: caller.clone(),
            program_id: program_id.clone(),
            store_ids: store_ids.to_vec(),
            receipt_operation: receipt.operation(),
            receipt_nonce: receipt.nonce(),
        });

        Ok(ComputeResult {
            compute_id: "compute-fake".into(),
        })
    }
}

/// Ledger double with failure injection.
///
/// Quotes and payments succeed by default; `fail_quote_at(n)` makes the
/// nth quote (1-based) fail, likewise `fail_pay_at` for payments.
/// Issued receipt nonces are recorded so tests can check that every
/// receipt a network double saw was actually paid for.
#[derive(Default)]
pub struct ScriptedLedger {
    quote_calls: AtomicUsize,
    pay_calls: AtomicUsize,
    fail_quote_at: Mutex<Option<usize>>,
    fail_pay_at: Mutex<Option<usize>>,
    issued_nonces: Mutex<Vec<u64>>,
    next_nonce: AtomicU64,
}

impl ScriptedLedger {
    /// Create a ledger that always succeeds.
    pub fn new() -> Self {
        Self {
            next_nonce: AtomicU64::new(1),
            ..Self::default()
        }
    }

    /// Make the nth quote (1-based) fail with `QuoteUnavailable`.
    pub fn fail_quote_at(self, n: usize) -> Self {
        *self.fail_quote_at.lock().unwrap() = Some(n);
        self
    }

    /// Make the nth payment (1-based) fail with `PaymentFailed`.
    pub fn fail_pay_at(self, n: usize) -> Self {
        *self.fail_pay_at.lock().unwrap() = Some(n);
        self
    }

    /// Number of quote calls observed.
    pub fn quote_count(&self) -> usize {
        self.quote_calls.load(Ordering::SeqCst)
    }

    /// Number of payment calls observed.
    pub fn pay_count(&self) -> usize {
        self.pay_calls.load(Ordering::SeqCst)
    }

    /// Nonces of all receipts this ledger has issued.
    pub fn issued_nonces(&self) -> Vec<u64> {
        self.issued_nonces.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    async fn quote(
        &self,
        operation: OperationKind,
        cluster_id: &ClusterId,
    ) -> Result<PriceQuote, PaymentError> {
        let call = self.quote_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if *self.fail_quote_at.lock().unwrap() == Some(call) {
            return Err(PaymentError::QuoteUnavailable(format!(
                "scripted failure at quote {call}"
            )));
        }

        let nonce = self.next_nonce.fetch_add(1, Ordering::SeqCst);
        Ok(PriceQuote::new(
            operation,
            cluster_id.clone(),
            TokenAmount(10),
            nonce,
        ))
    }

    async fn pay(&self, quote: &PriceQuote, _wallet: &Wallet) -> Result<PaymentReceipt, PaymentError> {
        let call = self.pay_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if *self.fail_pay_at.lock().unwrap() == Some(call) {
            return Err(PaymentError::PaymentFailed(format!(
                "scripted failure at payment {call}"
            )));
        }

        self.issued_nonces.lock().unwrap().push(quote.nonce());
        Ok(PaymentReceipt::new(quote, format!("tx-{:08}", quote.nonce())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster() -> ClusterId {
        ClusterId::new("test").unwrap()
    }

    #[tokio::test]
    async fn test_scripted_quote_failure() {
        let ledger = ScriptedLedger::new().fail_quote_at(2);

        assert!(ledger
            .quote(OperationKind::StoreSecrets, &cluster())
            .await
            .is_ok());
        assert!(ledger
            .quote(OperationKind::StoreSecrets, &cluster())
            .await
            .is_err());
        assert!(ledger
            .quote(OperationKind::StoreSecrets, &cluster())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_issued_nonces_recorded() {
        let ledger = ScriptedLedger::new();
        let wallet = Wallet::new("mesh1qtest", vec![1]);

        let quote = ledger
            .quote(OperationKind::Retrieve, &cluster())
            .await
            .unwrap();
        ledger.pay(&quote, &wallet).await.unwrap();

        assert_eq!(ledger.issued_nonces(), vec![quote.nonce()]);
    }

    #[tokio::test]
    async fn test_recording_network_sequential_store_ids() {
        let network = RecordingNetwork::new();
        let caller = UserId::new("u").unwrap();
        let binding = ProgramBinding::new(ProgramId::new("p").unwrap());
        let secrets = SecretSet::single("s", 1).unwrap();
        let permissions = PermissionSet::default_for_user(caller.clone());

        let mk_receipt = |nonce| {
            let quote = PriceQuote::new(
                OperationKind::StoreSecrets,
                cluster(),
                TokenAmount(10),
                nonce,
            );
            PaymentReceipt::new(&quote, format!("tx-{nonce}"))
        };

        let a = network
            .store_secrets(&cluster(), &caller, &binding, &secrets, &permissions, mk_receipt(1))
            .await
            .unwrap();
        let b = network
            .store_secrets(&cluster(), &caller, &binding, &secrets, &permissions, mk_receipt(2))
            .await
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(network.call_count(), 2);
    }
}
