//! Secrets: named values a party contributes for joint computation.
//!
//! A [`SecretSet`] is what one store operation submits to the network.
//! The actual secret-sharing scheme is owned entirely by the network
//! client; locally a secret is just a named plaintext value.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A single secret value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecretValue {
    /// A signed integer secret.
    Integer(i64),

    /// An opaque blob secret.
    Blob(Bytes),
}

impl SecretValue {
    /// The integer payload, if this is an integer secret.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SecretValue::Integer(v) => Some(*v),
            SecretValue::Blob(_) => None,
        }
    }
}

impl From<i64> for SecretValue {
    fn from(v: i64) -> Self {
        SecretValue::Integer(v)
    }
}

/// A named collection of secrets submitted in one store operation.
///
/// Names are unique within a set; ordering is deterministic (BTreeMap)
/// so the encoded form is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretSet {
    values: BTreeMap<String, SecretValue>,
}

impl SecretSet {
    /// Create an empty secret set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding a single named secret.
    pub fn single(name: impl Into<String>, value: impl Into<SecretValue>) -> Result<Self> {
        let mut set = Self::new();
        set.insert(name, value)?;
        Ok(set)
    }

    /// Insert a named secret.
    ///
    /// Fails on an empty name or a name already present in the set.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SecretValue>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::MalformedSecret("empty secret name".into()));
        }
        if self.values.contains_key(&name) {
            return Err(CoreError::MalformedSecret(format!(
                "duplicate secret name: {name:?}"
            )));
        }
        self.values.insert(name, value.into());
        Ok(())
    }

    /// Look up a secret by name.
    pub fn get(&self, name: &str) -> Option<&SecretValue> {
        self.values.get(name)
    }

    /// Number of secrets in the set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecretValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| CoreError::EncodingError(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e: ciborium::de::Error<std::io::Error>| {
            CoreError::DecodingError(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_secret() {
        let set = SecretSet::single("salary", 100_000).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("salary").unwrap().as_integer(), Some(100_000));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut set = SecretSet::new();
        assert!(set.insert("", 1).is_err());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut set = SecretSet::new();
        set.insert("x", 1).unwrap();
        let err = set.insert("x", 2).unwrap_err();
        assert!(matches!(err, CoreError::MalformedSecret(_)));
        // Original value untouched
        assert_eq!(set.get("x").unwrap().as_integer(), Some(1));
    }

    #[test]
    fn test_cbor_roundtrip() {
        let mut set = SecretSet::new();
        set.insert("salary", 100_001).unwrap();
        set.insert("note", SecretValue::Blob(Bytes::from_static(b"hello")))
            .unwrap();

        let bytes = set.to_bytes().unwrap();
        let recovered = SecretSet::from_bytes(&bytes).unwrap();
        assert_eq!(set, recovered);
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let mut set = SecretSet::new();
        set.insert("b", 2).unwrap();
        set.insert("a", 1).unwrap();
        let names: Vec<_> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
