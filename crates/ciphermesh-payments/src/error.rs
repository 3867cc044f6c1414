//! Error types for the payments module.

use thiserror::Error;

/// Errors raised by the quote → pay → invoke pipeline.
///
/// None of these are retried automatically; a caller that wants to retry
/// must start over with a fresh quote, since prices are not stable
/// across calls.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The ledger could not produce a price quote.
    #[error("quote unavailable: {0}")]
    QuoteUnavailable(String),

    /// Payment submission failed (funds, auth, or timeout).
    ///
    /// Terminal for the gated call: the operation must not be attempted
    /// without a receipt.
    #[error("payment failed: {0}")]
    PaymentFailed(String),

    /// The receipt does not match the operation kind it was presented for.
    #[error("receipt mismatch: {0}")]
    ReceiptMismatch(String),
}

/// Result type for payment operations.
pub type Result<T> = std::result::Result<T, PaymentError>;
