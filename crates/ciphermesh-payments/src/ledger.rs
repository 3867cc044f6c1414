//! The ledger collaborator: quotes and payment submission.
//!
//! The real ledger is an external blockchain client; this module defines
//! the trait the core depends on, plus an in-memory implementation used
//! by tests and the local devnet.

use async_trait::async_trait;

use ciphermesh_core::ClusterId;

use crate::error::{PaymentError, Result};
use crate::operation::{OperationKind, PaymentReceipt, PriceQuote, TokenAmount};

/// A funded wallet used to pay for operations.
///
/// The private key is opaque to the core; only ledger implementations
/// interpret it.
#[derive(Clone)]
pub struct Wallet {
    address: String,
    private_key: Vec<u8>,
}

impl Wallet {
    /// Create a wallet from an address and raw private key bytes.
    pub fn new(address: impl Into<String>, private_key: Vec<u8>) -> Self {
        Self {
            address: address.into(),
            private_key,
        }
    }

    /// The wallet's public address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The raw private key bytes.
    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of logs
        write!(f, "Wallet({})", self.address)
    }
}

/// The ledger collaborator.
///
/// Implementations must be thread-safe (Send + Sync). Both methods are
/// suspension points; neither is retried by this crate.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Quote the price of one operation against one cluster.
    ///
    /// Fails with [`PaymentError::QuoteUnavailable`] if the ledger is
    /// unreachable or the cluster is unknown.
    async fn quote(&self, operation: OperationKind, cluster_id: &ClusterId) -> Result<PriceQuote>;

    /// Pay the quoted price from the given wallet.
    ///
    /// Fails with [`PaymentError::PaymentFailed`] on insufficient funds,
    /// signature/auth failure, or submission timeout.
    async fn pay(&self, quote: &PriceQuote, wallet: &Wallet) -> Result<PaymentReceipt>;
}

/// A simple in-memory ledger for tests and the local devnet.
pub mod local {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// In-memory ledger: a fixed price table and a single balance pool.
    ///
    /// Nonces are issued sequentially; every successful payment mints a
    /// receipt whose tx hash is derived from the nonce.
    pub struct LocalLedger {
        inner: RwLock<LocalLedgerInner>,
    }

    struct LocalLedgerInner {
        prices: HashMap<OperationKind, TokenAmount>,
        balance: TokenAmount,
        next_nonce: u64,
    }

    /// Default price for operations without a table entry.
    const DEFAULT_PRICE: TokenAmount = TokenAmount(10);

    impl LocalLedger {
        /// Create a ledger with the given starting balance and default prices.
        pub fn new(balance: TokenAmount) -> Self {
            Self {
                inner: RwLock::new(LocalLedgerInner {
                    prices: HashMap::new(),
                    balance,
                    next_nonce: 1,
                }),
            }
        }

        /// Override the price of one operation kind.
        pub fn set_price(&self, operation: OperationKind, price: TokenAmount) {
            let mut inner = self.inner.write().unwrap();
            inner.prices.insert(operation, price);
        }

        /// Remaining balance.
        pub fn balance(&self) -> TokenAmount {
            self.inner.read().unwrap().balance
        }
    }

    #[async_trait]
    impl LedgerClient for LocalLedger {
        async fn quote(
            &self,
            operation: OperationKind,
            cluster_id: &ClusterId,
        ) -> Result<PriceQuote> {
            let mut inner = self.inner.write().unwrap();
            let cost = inner.prices.get(&operation).copied().unwrap_or(DEFAULT_PRICE);
            let nonce = inner.next_nonce;
            inner.next_nonce += 1;

            Ok(PriceQuote::new(operation, cluster_id.clone(), cost, nonce))
        }

        async fn pay(&self, quote: &PriceQuote, wallet: &Wallet) -> Result<PaymentReceipt> {
            let mut inner = self.inner.write().unwrap();

            let cost = quote.cost().as_unil();
            let balance = inner.balance.as_unil();
            if balance < cost {
                return Err(PaymentError::PaymentFailed(format!(
                    "insufficient funds in {}: have {}, need {}",
                    wallet.address(),
                    inner.balance,
                    quote.cost()
                )));
            }
            inner.balance = TokenAmount(balance - cost);

            let tx_hash = hex::encode(blake3::hash(&quote.nonce().to_le_bytes()).as_bytes());
            Ok(PaymentReceipt::new(quote, tx_hash))
        }
    }

}
