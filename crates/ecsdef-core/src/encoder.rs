//! Encoder — container definitions back to API wire JSON
//!
//! Output is deterministic:
//! - object keys appear in alphabetical wire-name order
//! - absent optionals and absent lists are omitted entirely
//! - present-but-empty lists are kept as `[]`
//! - map-valued fields (`dockerLabels`, log `options`) are key-sorted
//! - no whitespace between tokens
//!
//! The encoder does not canonicalize; [`crate::normalizer`] does that first
//! when a comparable form is wanted.

use serde::Serialize;

use crate::model::{ContainerDefinition, ContainerDefinitions};
use crate::{Error, Result};

/// Revision of the wire format produced by this encoder.
///
/// Bump whenever the byte output for an existing document changes, since
/// stored semantic hashes depend on it.
pub const WIRE_FORMAT_VERSION: u32 = 1;

/// Encode container definitions to wire bytes
pub fn encode(defs: &ContainerDefinitions) -> Result<Vec<u8>> {
    to_bytes(defs)
}

/// Encode a single container definition to wire bytes
pub fn encode_definition(def: &ContainerDefinition) -> Result<Vec<u8>> {
    to_bytes(def)
}

/// Render container definitions as the text sent to the API
pub fn render(defs: &ContainerDefinitions) -> Result<String> {
    serde_json::to_string(defs).map_err(|e| Error::Encode(e.to_string()))
}

fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| Error::Encode(e.to_string()))
}
