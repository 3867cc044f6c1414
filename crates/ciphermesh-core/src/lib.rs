//! # Ciphermesh Core
//!
//! Pure data types for the ciphermesh orchestration layer: identifiers,
//! secrets, and program bindings.
//!
//! This crate contains no I/O and no networking. Everything that talks to
//! the compute network or the payments ledger lives in the collaborator
//! crates; this one only defines the values they exchange.
//!
//! ## Key Types
//!
//! - [`UserId`], [`PartyId`], [`ProgramId`], [`StoreId`], [`ClusterId`] -
//!   opaque, validated string identifiers
//! - [`SecretValue`] / [`SecretSet`] - named values contributed by a party
//! - [`ProgramBinding`] - which party supplies which input slot of a program

pub mod binding;
pub mod error;
pub mod secret;
pub mod types;

pub use binding::ProgramBinding;
pub use error::CoreError;
pub use secret::{SecretSet, SecretValue};
pub use types::{ClusterId, PartyId, ProgramId, StoreId, UserId};
