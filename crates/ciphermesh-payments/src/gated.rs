//! The payment-gated call: quote → pay → invoke.
//!
//! Every mutating network operation in the system goes through
//! [`execute_gated`]. The sequence is strictly linear with no recovery
//! branches: a failed quote or payment aborts before the gated operation
//! runs, and the error surfaces to the caller. Retrying means starting
//! over with a fresh quote; receipts are never cached or reused.

use std::future::Future;

use thiserror::Error;

use ciphermesh_core::ClusterId;

use crate::error::PaymentError;
use crate::ledger::{LedgerClient, Wallet};
use crate::operation::{OperationKind, PaymentReceipt};

/// Failure of a payment-gated call.
///
/// Keeps the gated operation's own error type transparent so callers can
/// match on it without unwrapping strings.
#[derive(Debug, Error)]
pub enum GatedError<E> {
    /// The quote or payment step failed; the operation never ran.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// The paid-for operation itself failed.
    #[error(transparent)]
    Operation(E),
}

/// Run one operation through the mandatory quote → pay → invoke sequence.
///
/// 1. Quote the price of `operation` against `cluster_id`.
/// 2. Pay that exact price from `wallet`, obtaining a receipt.
/// 3. Invoke `thunk` with the receipt; the thunk performs the actual
///    network call and consumes the receipt.
///
/// The receipt is minted for the exact `operation` requested in step 1;
/// a thunk that presents it for a different kind is rejected server-side
/// with a receipt mismatch.
pub async fn execute_gated<L, F, Fut, T, E>(
    operation: OperationKind,
    cluster_id: &ClusterId,
    ledger: &L,
    wallet: &Wallet,
    thunk: F,
) -> Result<T, GatedError<E>>
where
    L: LedgerClient + ?Sized,
    F: FnOnce(PaymentReceipt) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let quote = ledger.quote(operation, cluster_id).await?;
    tracing::debug!(%operation, cluster = %cluster_id, cost = %quote.cost(), "quoted operation");

    let receipt = ledger.pay(&quote, wallet).await?;
    tracing::debug!(%operation, tx_hash = receipt.tx_hash(), "payment accepted");

    thunk(receipt).await.map_err(GatedError::Operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::local::LocalLedger;
    use crate::operation::TokenAmount;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cluster() -> ClusterId {
        ClusterId::new("devnet").unwrap()
    }

    fn wallet() -> Wallet {
        Wallet::new("mesh1qtest", vec![0x42; 32])
    }

    /// Ledger that refuses to quote.
    struct DownLedger;

    #[async_trait::async_trait]
    impl LedgerClient for DownLedger {
        async fn quote(
            &self,
            _operation: OperationKind,
            _cluster_id: &ClusterId,
        ) -> crate::Result<crate::PriceQuote> {
            Err(PaymentError::QuoteUnavailable("ledger unreachable".into()))
        }

        async fn pay(
            &self,
            _quote: &crate::PriceQuote,
            _wallet: &Wallet,
        ) -> crate::Result<PaymentReceipt> {
            unreachable!("pay must not be called when quoting fails")
        }
    }

    #[tokio::test]
    async fn test_receipt_reaches_thunk_with_matching_kind() {
        let ledger = LocalLedger::new(TokenAmount(100));

        let result = execute_gated(
            OperationKind::StoreSecrets,
            &cluster(),
            &ledger,
            &wallet(),
            |receipt| async move {
                assert_eq!(receipt.operation(), OperationKind::StoreSecrets);
                Ok::<_, std::convert::Infallible>(receipt.nonce())
            },
        )
        .await
        .unwrap();

        assert_eq!(result, 1);
    }

    #[tokio::test]
    async fn test_quote_failure_skips_thunk() {
        let calls = AtomicUsize::new(0);

        let result = execute_gated(
            OperationKind::StoreSecrets,
            &cluster(),
            &DownLedger,
            &wallet(),
            |_receipt| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::convert::Infallible>(())
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(GatedError::Payment(PaymentError::QuoteUnavailable(_)))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_payment_failure_skips_thunk() {
        let ledger = LocalLedger::new(TokenAmount(0));
        let calls = AtomicUsize::new(0);

        let result = execute_gated(
            OperationKind::Compute,
            &cluster(),
            &ledger,
            &wallet(),
            |_receipt| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::convert::Infallible>(())
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(GatedError::Payment(PaymentError::PaymentFailed(_)))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_operation_error_propagates() {
        let ledger = LocalLedger::new(TokenAmount(100));

        let result: Result<(), _> = execute_gated(
            OperationKind::Retrieve,
            &cluster(),
            &ledger,
            &wallet(),
            |_receipt| async { Err("store not found") },
        )
        .await;

        assert!(matches!(result, Err(GatedError::Operation("store not found"))));
        // Payment was still made; the caller decides whether to re-quote.
        assert_eq!(ledger.balance(), TokenAmount(90));
    }
}
