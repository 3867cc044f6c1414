//! # Ciphermesh
//!
//! Permission- and payment-gated multi-party secret orchestration.
//!
//! ## Overview
//!
//! Ciphermesh coordinates independent parties who each hold a secret
//! that a remote compute network will later combine. Two gates apply to
//! every interaction:
//!
//! - **Permissions**: each stored secret carries a [`PermissionSet`]
//!   deciding, per user, whether that user may retrieve, update, delete,
//!   or compute on it.
//! - **Payments**: every mutating network call must be preceded by a
//!   price quote and a single-use payment receipt.
//!
//! The [`Coordinator`] drives N parties through store/bind/permission
//! steps so their secrets become jointly addressable by one downstream
//! compute call, and rewrites permissions to revoke access.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ciphermesh::{Coordinator, PartyDescriptor};
//! use ciphermesh::client::{LocalCluster, NodeKey, UserKey};
//! use ciphermesh::core::{ClusterId, ProgramId, UserId};
//! use ciphermesh::payments::{LocalLedger, TokenAmount, Wallet};
//!
//! async fn example() {
//!     let network = Arc::new(LocalCluster::new());
//!     let ledger = Arc::new(LocalLedger::new(TokenAmount(1000)));
//!     let wallet = Wallet::new("mesh1qdemo", vec![0x42; 32]);
//!     let cluster_id = ClusterId::new("devnet").unwrap();
//!
//!     let coordinator = Coordinator::new(network, ledger, wallet, cluster_id);
//!
//!     let parties = vec![
//!         PartyDescriptor {
//!             party_name: "Bob".into(),
//!             secret_name: "bob_salary".into(),
//!             secret_value: 100_000,
//!             user_key: UserKey::generate(),
//!             node_key: NodeKey::generate(),
//!         },
//!     ];
//!
//!     let program_id = ProgramId::new("prog1").unwrap();
//!     let alice = UserId::new("alice_uid").unwrap();
//!     let stored = coordinator
//!         .store_all(&parties, &program_id, &alice)
//!         .await
//!         .unwrap();
//!     println!("{}:{}", stored[0].party_id, stored[0].store_id);
//! }
//! ```

pub mod coordinator;
pub mod error;

// Re-export component crates
pub use ciphermesh_client as client;
pub use ciphermesh_core as core;
pub use ciphermesh_payments as payments;
pub use ciphermesh_perms as perms;

// Re-export main types for convenience
pub use coordinator::{Coordinator, PartyDescriptor, PartyStore};
pub use error::{Error, Result};

// Re-export commonly used collaborator types
pub use ciphermesh_client::{ComputeResult, NetworkClient, NetworkError, PartySession};
pub use ciphermesh_core::{ClusterId, PartyId, ProgramBinding, ProgramId, SecretSet, StoreId, UserId};
pub use ciphermesh_payments::{execute_gated, LedgerClient, OperationKind, PaymentError, Wallet};
pub use ciphermesh_perms::PermissionSet;
