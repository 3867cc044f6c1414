//! Test fixtures and helpers.
//!
//! Deterministic key material and multi-party scenario builders for
//! integration tests.

use std::sync::Arc;

use ciphermesh_client::keys::{NodeKey, UserKey};
use ciphermesh_client::{NetworkClient, PartySession};

/// One party's deterministic key material.
pub struct PartyFixture {
    pub user_key: UserKey,
    pub node_key: NodeKey,
}

impl PartyFixture {
    /// Create a fixture with seeded, reproducible keys.
    pub fn with_seed(seed: u8) -> Self {
        let mut user_seed = [0u8; 32];
        user_seed[0] = seed;
        user_seed[1] = 0x01;
        let mut node_seed = [0u8; 32];
        node_seed[0] = seed;
        node_seed[1] = 0x02;

        Self {
            user_key: UserKey::from_seed(&user_seed),
            node_key: NodeKey::from_seed(&node_seed),
        }
    }

    /// Open a session for this fixture on the given network.
    pub fn session<N: NetworkClient>(&self, network: Arc<N>) -> PartySession<N> {
        PartySession::open(&self.user_key, &self.node_key, network)
    }
}

/// Distinct fixtures for multi-party tests.
pub fn party_fixtures(count: usize) -> Vec<PartyFixture> {
    (0..count).map(|i| PartyFixture::with_seed(i as u8)).collect()
}

/// One party of a scripted multi-party scenario: role, secret, keys.
///
/// Deliberately crate-local rather than reusing the facade's descriptor
/// type, so the testkit stays usable from every crate in the workspace.
pub struct ScenarioParty {
    pub party_name: String,
    pub secret_name: String,
    pub secret_value: i64,
    pub fixture: PartyFixture,
}

/// The classic millionaires scenario: `count` parties named Bob,
/// Charlie, Dana, … each contributing a salary starting at 100000.
pub fn millionaires(count: usize) -> Vec<ScenarioParty> {
    const NAMES: [&str; 8] = [
        "Bob", "Charlie", "Dana", "Erin", "Frank", "Grace", "Heidi", "Ivan",
    ];

    (0..count)
        .map(|i| {
            let party_name = if i < NAMES.len() {
                NAMES[i].to_string()
            } else {
                format!("Party{}", i + 1)
            };
            ScenarioParty {
                secret_name: format!("{}_salary", party_name.to_lowercase()),
                secret_value: 100_000 + i as i64,
                party_name,
                fixture: PartyFixture::with_seed(i as u8),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_have_distinct_keys() {
        let parties = party_fixtures(3);
        let pks: Vec<_> = parties
            .iter()
            .map(|p| p.user_key.public_key_bytes())
            .collect();
        assert_ne!(pks[0], pks[1]);
        assert_ne!(pks[1], pks[2]);
    }

    #[test]
    fn test_fixture_is_deterministic() {
        let a = PartyFixture::with_seed(7);
        let b = PartyFixture::with_seed(7);
        assert_eq!(a.user_key.public_key_bytes(), b.user_key.public_key_bytes());
        assert_eq!(a.node_key.public_key_bytes(), b.node_key.public_key_bytes());
    }

    #[test]
    fn test_millionaires_scenario_shape() {
        let parties = millionaires(2);
        assert_eq!(parties[0].party_name, "Bob");
        assert_eq!(parties[0].secret_value, 100_000);
        assert_eq!(parties[1].party_name, "Charlie");
        assert_eq!(parties[1].secret_value, 100_001);
    }
}
