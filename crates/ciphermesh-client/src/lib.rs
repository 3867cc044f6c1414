//! # Ciphermesh Client
//!
//! The client side of the compute network: the [`NetworkClient`]
//! collaborator trait, authenticated [`PartySession`]s, key material
//! loading, and environment-sourced configuration.
//!
//! ## Overview
//!
//! - [`NetworkClient`] - the opaque network collaborator
//!   (`store_secrets`, `retrieve`, `update_permissions`, `compute`),
//!   every call requiring a payment receipt
//! - [`PartySession`] - one participant's handle: key-derived
//!   `user_id`/`party_id` plus delegation to the network
//! - [`LocalCluster`] - in-memory backend used by tests and the devnet
//!   CLI; enforces receipt single-use and permission checks
//! - [`Config`] - explicit configuration struct built from environment
//!   variables, never ambient globals

pub mod config;
pub mod error;
pub mod keys;
pub mod local;
pub mod network;
pub mod session;

pub use config::{Config, PartyConfig};
pub use error::ClientError;
pub use keys::{load_node_key, load_user_key, KeyLoadError, NodeKey, UserKey};
pub use local::LocalCluster;
pub use network::{ComputeResult, NetworkClient, NetworkError};
pub use session::PartySession;
