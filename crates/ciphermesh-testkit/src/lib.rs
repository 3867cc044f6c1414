//! # Ciphermesh Testkit
//!
//! Testing utilities for the ciphermesh workspace.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fakes**: recording doubles for the network and ledger
//!   collaborators, with failure injection
//! - **Fixtures**: deterministic key material and multi-party
//!   descriptor builders
//! - **Generators**: proptest strategies for ids, values, and
//!   permission sets
//!
//! ## Recording doubles
//!
//! [`RecordingNetwork`] captures every call with a snapshot of the
//! submitted permission set and the receipt it consumed, so tests can
//! assert both *what* was submitted and *that it was paid for first*:
//!
//! ```rust,ignore
//! let network = Arc::new(RecordingNetwork::new());
//! // ... drive the coordinator ...
//! let calls = network.calls();
//! assert!(matches!(calls[0], NetworkCall::StoreSecrets { .. }));
//! ```

pub mod fakes;
pub mod fixtures;
pub mod generators;

pub use fakes::{NetworkCall, RecordingNetwork, ScriptedLedger};
pub use fixtures::{millionaires, party_fixtures, PartyFixture, ScenarioParty};
