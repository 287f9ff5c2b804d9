//! Equivalence predicate — is the declared document the observed document?
//!
//! Both inputs are decoded independently, canonicalized, and encoded; the
//! documents are equivalent when the encodings are byte-identical. There is
//! no best-effort comparison: any decode or encode failure on either side
//! aborts the call.

use std::fmt;

use tracing::debug;

use crate::encoder;
use crate::model::ContainerDefinitions;
use crate::normalizer::normalize_definitions;
use crate::parser::decode;
use crate::Result;

/// Decide whether two container definitions documents are equivalent
///
/// # Errors
/// Returns `Decode` naming input `"a"` or `"b"` for malformed text, or
/// `Encode` if a canonical form cannot be serialized.
///
/// # Example
/// ```
/// use ecsdef_core::equivalence::definitions_are_equivalent;
///
/// let a = r#"[{"name":"b","essential":true},{"name":"a"}]"#;
/// let b = r#"[{"name":"a","essential":true},{"name":"b","essential":true}]"#;
/// assert!(definitions_are_equivalent(a, b, false).unwrap());
/// ```
pub fn definitions_are_equivalent(a: &str, b: &str, is_awsvpc: bool) -> Result<bool> {
    let bytes_a = canonical_bytes("a", a, is_awsvpc)?;
    let bytes_b = canonical_bytes("b", b, is_awsvpc)?;
    let equal = bytes_a == bytes_b;
    debug!(equal, is_awsvpc, "compared container definitions");
    Ok(equal)
}

fn canonical_bytes(input: &str, text: &str, is_awsvpc: bool) -> Result<Vec<u8>> {
    let defs = decode(input, text)?;
    encoder::encode(&normalize_definitions(&defs, is_awsvpc))
}

// ── Per-container diff ─────────────────────────────────────

/// How one container differs between two documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerChange {
    /// Present only in `b`
    Added(String),
    /// Present only in `a`
    Removed(String),
    /// Present in both with different canonical forms
    Changed(String),
}

impl ContainerChange {
    pub fn name(&self) -> &str {
        match self {
            ContainerChange::Added(n) | ContainerChange::Removed(n) | ContainerChange::Changed(n) => n,
        }
    }
}

impl fmt::Display for ContainerChange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContainerChange::Added(n) => write!(f, "+ {}", n),
            ContainerChange::Removed(n) => write!(f, "- {}", n),
            ContainerChange::Changed(n) => write!(f, "~ {}", n),
        }
    }
}

/// List the containers that differ between two documents
///
/// Containers are matched by name after canonicalization; the result is in
/// canonical (name) order. An empty result means the documents are
/// equivalent. With duplicate names, the n-th occurrence in `a` is matched
/// with the n-th occurrence in `b`.
pub fn diff_definitions(a: &str, b: &str, is_awsvpc: bool) -> Result<Vec<ContainerChange>> {
    let left = normalize_definitions(&decode("a", a)?, is_awsvpc);
    let right = normalize_definitions(&decode("b", b)?, is_awsvpc);
    diff_canonical(&left, &right)
}

fn diff_canonical(
    left: &ContainerDefinitions,
    right: &ContainerDefinitions,
) -> Result<Vec<ContainerChange>> {
    let mut changes = Vec::new();
    let (mut i, mut j) = (0, 0);

    // Both sides are sorted by name: merge-walk them
    while i < left.len() || j < right.len() {
        let l = left.get(i);
        let r = right.get(j);
        match (l, r) {
            (Some(l), Some(r)) if l.name_key() == r.name_key() => {
                if encoder::encode_definition(l)? != encoder::encode_definition(r)? {
                    changes.push(ContainerChange::Changed(l.name_key().to_string()));
                }
                i += 1;
                j += 1;
            }
            (Some(l), Some(r)) if l.name_key() < r.name_key() => {
                changes.push(ContainerChange::Removed(l.name_key().to_string()));
                i += 1;
            }
            (Some(_), Some(r)) => {
                changes.push(ContainerChange::Added(r.name_key().to_string()));
                j += 1;
            }
            (Some(l), None) => {
                changes.push(ContainerChange::Removed(l.name_key().to_string()));
                i += 1;
            }
            (None, Some(r)) => {
                changes.push(ContainerChange::Added(r.name_key().to_string()));
                j += 1;
            }
            (None, None) => break,
        }
    }

    Ok(changes)
}
