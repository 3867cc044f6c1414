//! Priced operations, quotes, and receipts.

use serde::{Deserialize, Serialize};
use std::fmt;

use ciphermesh_core::ClusterId;

/// The network operation a quote or receipt applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Store a permissioned secret set.
    StoreSecrets,
    /// Replace the permission set of a stored secret.
    UpdatePermissions,
    /// Retrieve a stored secret value.
    Retrieve,
    /// Run a program over stored secrets.
    Compute,
    /// Upload a compiled program artifact.
    StoreProgram,
}

impl OperationKind {
    /// Stable wire/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::StoreSecrets => "store_secrets",
            OperationKind::UpdatePermissions => "update_permissions",
            OperationKind::Retrieve => "retrieve",
            OperationKind::Compute => "compute",
            OperationKind::StoreProgram => "store_program",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An amount of network tokens (unil).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TokenAmount(pub u64);

impl TokenAmount {
    /// Zero tokens.
    pub const ZERO: Self = Self(0);

    /// The raw unil count.
    pub const fn as_unil(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} unil", self.0)
    }
}

/// A ledger price quote for one operation against one cluster.
///
/// Quotes are not assumed stable across calls; a fresh quote is required
/// for every gated operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    operation: OperationKind,
    cluster_id: ClusterId,
    cost: TokenAmount,
    nonce: u64,
}

impl PriceQuote {
    /// Create a quote. Ledger implementations mint these.
    pub fn new(operation: OperationKind, cluster_id: ClusterId, cost: TokenAmount, nonce: u64) -> Self {
        Self {
            operation,
            cluster_id,
            cost,
            nonce,
        }
    }

    /// The operation this quote prices.
    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    /// The cluster the quote is scoped to.
    pub fn cluster_id(&self) -> &ClusterId {
        &self.cluster_id
    }

    /// The quoted cost.
    pub fn cost(&self) -> TokenAmount {
        self.cost
    }

    /// The ledger-assigned nonce carried into the receipt.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }
}

/// Proof that one operation, for one cluster, has been paid for.
///
/// Not `Clone`: a receipt is consumed by exactly one network call. The
/// network re-checks the nonce server-side, so a receipt survives at
/// most one round trip even if this crate is misused via serde.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    operation: OperationKind,
    cluster_id: ClusterId,
    nonce: u64,
    tx_hash: String,
}

impl PaymentReceipt {
    /// Create a receipt. Ledger implementations mint these after a
    /// successful payment submission.
    pub fn new(quote: &PriceQuote, tx_hash: String) -> Self {
        Self {
            operation: quote.operation(),
            cluster_id: quote.cluster_id().clone(),
            nonce: quote.nonce(),
            tx_hash,
        }
    }

    /// The operation this receipt pays for.
    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    /// The cluster this receipt is scoped to.
    pub fn cluster_id(&self) -> &ClusterId {
        &self.cluster_id
    }

    /// The single-use nonce.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The ledger transaction hash backing this receipt.
    pub fn tx_hash(&self) -> &str {
        &self.tx_hash
    }
}
