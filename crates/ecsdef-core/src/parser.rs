//! Decoder — container definitions JSON text into typed records
//!
//! Two entry points:
//!
//! - [`decode`] turns text into a [`ContainerDefinitions`] sequence, naming
//!   the input in any error so callers comparing two documents can tell
//!   which side was malformed.
//! - [`parse`] is the user-facing variant: it also rejects records whose
//!   every field is zero, which means an empty `{}` slipped into the array.

use tracing::debug;

use crate::model::ContainerDefinitions;
use crate::zero::IsZero;
use crate::{Error, Result};

/// Decode JSON text into container definitions
///
/// # Errors
/// Returns `Decode` carrying `input`, the line and column, and the
/// parser message for any malformed text (including empty input).
pub fn decode(input: &str, text: &str) -> Result<ContainerDefinitions> {
    let defs: ContainerDefinitions =
        serde_json::from_str(text).map_err(|e| Error::decode(input, &e))?;
    debug!(input, containers = defs.len(), "decoded container definitions");
    Ok(defs)
}

/// Decode and validate container definitions authored by a user
///
/// # Errors
/// Returns `Decode` for malformed text, or `Validation { index }` for the
/// first record whose every field is at its zero value.
pub fn parse(text: &str) -> Result<ContainerDefinitions> {
    let defs = decode("container_definitions", text)?;
    if let Some(index) = defs.iter().position(|d| d.is_zero()) {
        return Err(Error::Validation { index });
    }
    Ok(defs)
}
