//! # Ciphermesh Payments
//!
//! The pay-per-operation protocol: every mutating interaction with the
//! compute network must be preceded by a price quote and a payment
//! receipt.
//!
//! ## Overview
//!
//! - [`OperationKind`] names the priced operation.
//! - [`LedgerClient`] is the external ledger collaborator:
//!   `quote(operation, cluster) -> PriceQuote`, then
//!   `pay(&quote, &wallet) -> PaymentReceipt`.
//! - [`execute_gated`] is the single choke point that runs the mandatory
//!   quote → pay → invoke sequence for one operation.
//!
//! ## Single-use receipts
//!
//! [`PaymentReceipt`] is deliberately not `Clone`, and gated thunks take
//! it by value: a receipt can be bound to exactly one network call. The
//! network additionally accounts nonces server-side.

pub mod error;
pub mod gated;
pub mod ledger;
pub mod operation;

pub use error::{PaymentError, Result};
pub use gated::{execute_gated, GatedError};
pub use ledger::{local::LocalLedger, LedgerClient, Wallet};
pub use operation::{OperationKind, PaymentReceipt, PriceQuote, TokenAmount};
