//! Environment-sourced configuration.
//!
//! All runtime settings live in an explicit [`Config`] struct handed to
//! constructors; nothing reads the environment lazily. The lookup
//! function is injectable so tests can run against a plain map instead
//! of process-global env vars.

use ciphermesh_core::ClusterId;
use ciphermesh_payments::Wallet;

use crate::error::ClientError;

/// Env var names.
const ENV_CLUSTER_ID: &str = "CIPHERMESH_CLUSTER_ID";
const ENV_GRPC_ENDPOINT: &str = "CIPHERMESH_GRPC_ENDPOINT";
const ENV_CHAIN_ID: &str = "CIPHERMESH_CHAIN_ID";
const ENV_WALLET_PRIVATE_KEY: &str = "CIPHERMESH_WALLET_PRIVATE_KEY";

/// Per-party configuration: role, secret, and key file locations.
#[derive(Debug, Clone)]
pub struct PartyConfig {
    pub party_name: String,
    pub secret_name: String,
    pub secret_value: i64,
    pub user_key_path: String,
    pub node_key_path: String,
}

/// Run configuration for a ciphermesh client process.
#[derive(Debug, Clone)]
pub struct Config {
    pub cluster_id: ClusterId,
    pub grpc_endpoint: String,
    pub chain_id: String,
    wallet_private_key: Vec<u8>,
    pub parties: Vec<PartyConfig>,
}

impl Config {
    /// Build configuration from process environment variables.
    ///
    /// Missing or malformed required input is a fatal startup error.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary lookup function.
    ///
    /// Parties are discovered by probing
    /// `CIPHERMESH_USERKEY_PATH_PARTY_<n>` for n = 1, 2, … until the
    /// first gap; each discovered party requires a node key path and a
    /// secret value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| ClientError::Config(format!("missing required {key}")))
        };

        let cluster_id = ClusterId::new(required(ENV_CLUSTER_ID)?)
            .map_err(|e| ClientError::Config(e.to_string()))?;
        let grpc_endpoint = required(ENV_GRPC_ENDPOINT)?;
        let chain_id = required(ENV_CHAIN_ID)?;

        let wallet_hex = required(ENV_WALLET_PRIVATE_KEY)?;
        let wallet_private_key = hex::decode(wallet_hex.trim()).map_err(|e| {
            ClientError::Config(format!("malformed {ENV_WALLET_PRIVATE_KEY}: {e}"))
        })?;

        let mut parties = Vec::new();
        for n in 1.. {
            let Some(user_key_path) = lookup(&format!("CIPHERMESH_USERKEY_PATH_PARTY_{n}")) else {
                break;
            };
            let node_key_path = required(&format!("CIPHERMESH_NODEKEY_PATH_PARTY_{n}"))?;

            let party_name = lookup(&format!("CIPHERMESH_PARTY_{n}_NAME"))
                .unwrap_or_else(|| format!("Party{n}"));
            let secret_name = lookup(&format!("CIPHERMESH_PARTY_{n}_SECRET_NAME"))
                .unwrap_or_else(|| format!("secret_{n}"));
            let secret_value = required(&format!("CIPHERMESH_PARTY_{n}_SECRET_VALUE"))?
                .parse::<i64>()
                .map_err(|e| {
                    ClientError::Config(format!("malformed secret value for party {n}: {e}"))
                })?;

            parties.push(PartyConfig {
                party_name,
                secret_name,
                secret_value,
                user_key_path,
                node_key_path,
            });
        }

        Ok(Self {
            cluster_id,
            grpc_endpoint,
            chain_id,
            wallet_private_key,
            parties,
        })
    }

    /// The funded wallet for this run.
    ///
    /// The address is derived from the private key the same way the
    /// ledger derives it, so one env var configures both halves.
    pub fn wallet(&self) -> Wallet {
        let digest = blake3::hash(&self.wallet_private_key);
        let address = format!("mesh1{}", &hex::encode(digest.as_bytes())[..20]);
        Wallet::new(address, self.wallet_private_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert(ENV_CLUSTER_ID.into(), "devnet".into());
        env.insert(ENV_GRPC_ENDPOINT.into(), "http://localhost:9090".into());
        env.insert(ENV_CHAIN_ID.into(), "mesh-chain-1".into());
        env.insert(ENV_WALLET_PRIVATE_KEY.into(), hex::encode([7u8; 32]));
        env
    }

    fn from_map(env: &HashMap<String, String>) -> Result<Config, ClientError> {
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_minimal_config() {
        let config = from_map(&base_env()).unwrap();
        assert_eq!(config.cluster_id.as_str(), "devnet");
        assert!(config.parties.is_empty());
        assert!(config.wallet().address().starts_with("mesh1"));
    }

    #[test]
    fn test_missing_cluster_is_fatal() {
        let mut env = base_env();
        env.remove(ENV_CLUSTER_ID);
        let err = from_map(&env).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_malformed_wallet_key_is_fatal() {
        let mut env = base_env();
        env.insert(ENV_WALLET_PRIVATE_KEY.into(), "zz-not-hex".into());
        assert!(from_map(&env).is_err());
    }

    #[test]
    fn test_party_discovery_stops_at_gap() {
        let mut env = base_env();
        for n in [1, 2, 4] {
            env.insert(
                format!("CIPHERMESH_USERKEY_PATH_PARTY_{n}"),
                format!("/keys/user{n}"),
            );
            env.insert(
                format!("CIPHERMESH_NODEKEY_PATH_PARTY_{n}"),
                format!("/keys/node{n}"),
            );
            env.insert(
                format!("CIPHERMESH_PARTY_{n}_SECRET_VALUE"),
                format!("{}", 100_000 + n),
            );
        }

        let config = from_map(&env).unwrap();
        // Party 4 is unreachable behind the gap at 3
        assert_eq!(config.parties.len(), 2);
        assert_eq!(config.parties[0].party_name, "Party1");
        assert_eq!(config.parties[1].secret_value, 100_002);
    }

    #[test]
    fn test_party_missing_node_key_is_fatal() {
        let mut env = base_env();
        env.insert(
            "CIPHERMESH_USERKEY_PATH_PARTY_1".into(),
            "/keys/user1".into(),
        );
        assert!(from_map(&env).is_err());
    }

    #[test]
    fn test_party_overrides() {
        let mut env = base_env();
        env.insert(
            "CIPHERMESH_USERKEY_PATH_PARTY_1".into(),
            "/keys/user1".into(),
        );
        env.insert(
            "CIPHERMESH_NODEKEY_PATH_PARTY_1".into(),
            "/keys/node1".into(),
        );
        env.insert("CIPHERMESH_PARTY_1_NAME".into(), "Bob".into());
        env.insert("CIPHERMESH_PARTY_1_SECRET_NAME".into(), "salary".into());
        env.insert("CIPHERMESH_PARTY_1_SECRET_VALUE".into(), "100000".into());

        let config = from_map(&env).unwrap();
        assert_eq!(config.parties[0].party_name, "Bob");
        assert_eq!(config.parties[0].secret_name, "salary");
        assert_eq!(config.parties[0].secret_value, 100_000);
    }
}
