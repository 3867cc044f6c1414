//! Strong identifier types for the ciphermesh network.
//!
//! All identifiers are newtypes over opaque strings to prevent misuse at
//! compile time. User and party ids are *derived* by the network client
//! from key material; the core only validates that they are well formed
//! (non-empty, no surrounding whitespace).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident, $err:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a validated identifier.
            ///
            /// Fails if the input is empty or has surrounding whitespace.
            pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
                let value = value.into();
                if value.is_empty() || value.trim() != value {
                    return Err(CoreError::$err(format!(
                        concat!("malformed ", $label, ": {:?}"),
                        value
                    )));
                }
                Ok(Self(value))
            }

            /// View as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume into the underlying string.
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// A user identity on the network, derived from a user key pair.
    ///
    /// Permission sets key their grants by `UserId`.
    UserId,
    InvalidIdentity,
    "user id"
);

string_id!(
    /// A party identity within a program execution, derived from key material.
    PartyId,
    InvalidIdentity,
    "party id"
);

string_id!(
    /// Reference to a compiled program artifact stored on the network.
    ///
    /// The core never inspects program contents; it only threads the id
    /// through bindings and compute-permission entries.
    ProgramId,
    InvalidProgramReference,
    "program id"
);

string_id!(
    /// Handle identifying a stored secret on the network.
    StoreId,
    InvalidIdentity,
    "store id"
);

string_id!(
    /// The addressed instance of the compute network a client talks to.
    ClusterId,
    InvalidIdentity,
    "cluster id"
);
