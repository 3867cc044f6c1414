//! Key material: user keys and node keys.
//!
//! Wraps ed25519-dalek signing keys with strong types. Keys are loaded
//! from hex-encoded seed files; identities are later derived from the
//! public halves (see [`crate::session`]).

use std::fmt;
use std::path::Path;

use ed25519_dalek::SigningKey;
use thiserror::Error;

/// Errors loading key material from disk.
///
/// Fatal: credentials are static for a run, so these are never retried.
#[derive(Debug, Error)]
pub enum KeyLoadError {
    #[error("cannot read key file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt key file {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

macro_rules! keypair_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone)]
        pub struct $name {
            signing_key: SigningKey,
        }

        impl $name {
            /// Generate a new random key.
            pub fn generate() -> Self {
                let mut rng = rand::thread_rng();
                Self {
                    signing_key: SigningKey::generate(&mut rng),
                }
            }

            /// Create from a 32-byte seed.
            pub fn from_seed(seed: &[u8; 32]) -> Self {
                Self {
                    signing_key: SigningKey::from_bytes(seed),
                }
            }

            /// The public key bytes.
            pub fn public_key_bytes(&self) -> [u8; 32] {
                self.signing_key.verifying_key().to_bytes()
            }

            /// The raw seed bytes (secret key material).
            pub fn seed(&self) -> [u8; 32] {
                self.signing_key.to_bytes()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Never print seed material
                write!(
                    f,
                    concat!(stringify!($name), "({})"),
                    &hex::encode(self.public_key_bytes())[..16]
                )
            }
        }
    };
}

keypair_type!(
    /// A user's key pair; the network derives the stable `user_id` from it.
    UserKey
);

keypair_type!(
    /// A node key pair; combined with the user key it yields the `party_id`.
    NodeKey
);

fn load_seed(path: &Path) -> Result<[u8; 32], KeyLoadError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| KeyLoadError::Io {
        path: display.clone(),
        source,
    })?;

    let bytes = hex::decode(contents.trim()).map_err(|e| KeyLoadError::Corrupt {
        path: display.clone(),
        reason: e.to_string(),
    })?;

    let seed: [u8; 32] = bytes.as_slice().try_into().map_err(|_| KeyLoadError::Corrupt {
        path: display,
        reason: format!("expected 32-byte seed, got {} bytes", bytes.len()),
    })?;

    Ok(seed)
}

/// Load a user key from a hex-encoded seed file.
pub fn load_user_key(path: impl AsRef<Path>) -> Result<UserKey, KeyLoadError> {
    load_seed(path.as_ref()).map(|seed| UserKey::from_seed(&seed))
}

/// Load a node key from a hex-encoded seed file.
pub fn load_node_key(path: impl AsRef<Path>) -> Result<NodeKey, KeyLoadError> {
    load_seed(path.as_ref()).map(|seed| NodeKey::from_seed(&seed))
}
