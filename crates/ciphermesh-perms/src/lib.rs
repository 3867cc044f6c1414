//! # Ciphermesh Permissions
//!
//! Per-secret access control objects for the ciphermesh network.
//!
//! ## Overview
//!
//! Every stored secret carries a [`PermissionSet`]: who may retrieve,
//! update, or delete it, and which users may run which programs against
//! it. Sets are constructed and mutated locally, then submitted to the
//! network through a payment-gated call. The network never patches a set
//! in place; resubmitting **replaces** the previous rights wholesale.
//!
//! ## Invariants
//!
//! - The creating user always holds full retrieve/update/delete rights;
//!   a set cannot be constructed without this baseline.
//! - Non-owner rights default to deny.
//! - Compute grants are additive and idempotent, keyed per program.
//!
//! ## Usage
//!
//! ```rust
//! use ciphermesh_core::{ProgramId, UserId};
//! use ciphermesh_perms::PermissionSet;
//!
//! let owner = UserId::new("bob_uid").unwrap();
//! let alice = UserId::new("alice_uid").unwrap();
//! let prog = ProgramId::new("prog1").unwrap();
//!
//! let mut permissions = PermissionSet::default_for_user(owner.clone());
//! permissions.grant_compute(alice.clone(), prog.clone());
//!
//! assert!(permissions.is_retrieve_allowed(&owner));
//! assert!(!permissions.is_retrieve_allowed(&alice));
//! assert!(permissions.is_compute_allowed(&alice, &prog));
//! ```

pub mod error;
pub mod set;

pub use error::{PermsError, Result};
pub use set::PermissionSet;
