//! Program bindings: which party supplies which slot of a program.
//!
//! A binding associates a program with the network-level parties that
//! feed its named input slots (and, optionally, receive its outputs).
//! Every party name a program references must be registered before the
//! bound store or compute call executes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::{PartyId, ProgramId};

/// Binding of program input/output slots to network parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramBinding {
    program_id: ProgramId,
    input_parties: BTreeMap<String, PartyId>,
    output_parties: BTreeMap<String, PartyId>,
}

impl ProgramBinding {
    /// Create an empty binding for a program.
    pub fn new(program_id: ProgramId) -> Self {
        Self {
            program_id,
            input_parties: BTreeMap::new(),
            output_parties: BTreeMap::new(),
        }
    }

    /// The program this binding targets.
    pub fn program_id(&self) -> &ProgramId {
        &self.program_id
    }

    /// Register the party supplying the named input slot.
    ///
    /// Fails if the name is empty or the slot is already bound.
    pub fn add_input_party(&mut self, party_name: impl Into<String>, party_id: PartyId) -> Result<()> {
        let party_name = party_name.into();
        if party_name.is_empty() {
            return Err(CoreError::InvalidIdentity("empty party name".into()));
        }
        if self.input_parties.contains_key(&party_name) {
            return Err(CoreError::DuplicateParty(party_name));
        }
        self.input_parties.insert(party_name, party_id);
        Ok(())
    }

    /// Register the party receiving the named output slot.
    pub fn add_output_party(
        &mut self,
        party_name: impl Into<String>,
        party_id: PartyId,
    ) -> Result<()> {
        let party_name = party_name.into();
        if party_name.is_empty() {
            return Err(CoreError::InvalidIdentity("empty party name".into()));
        }
        if self.output_parties.contains_key(&party_name) {
            return Err(CoreError::DuplicateParty(party_name));
        }
        self.output_parties.insert(party_name, party_id);
        Ok(())
    }

    /// Look up the party bound to an input slot.
    pub fn input_party(&self, party_name: &str) -> Option<&PartyId> {
        self.input_parties.get(party_name)
    }

    /// Iterate over bound input slots in name order.
    pub fn input_parties(&self) -> impl Iterator<Item = (&str, &PartyId)> {
        self.input_parties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over bound output slots in name order.
    pub fn output_parties(&self) -> impl Iterator<Item = (&str, &PartyId)> {
        self.output_parties.iter().map(|(k, v)| (k.as_str(), v))
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
