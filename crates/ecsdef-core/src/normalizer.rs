//! Canonical normalizer — converts container definitions to canonical form
//!
//! The canonical form is what the control plane would echo back for a
//! document: containers in a fixed order, defaults filled in, placeholder
//! list entries dropped, and empty lists indistinguishable from absent ones.
//! Two documents are equivalent exactly when their canonical encodings are
//! byte-identical.
//!
//! # Pipeline
//!
//! `JSON text → decode → normalize_definitions → encode → SHA-256`
//!
//! # Guarantees
//!
//! - **Idempotent**: `normalize(normalize(x)) == normalize(x)`
//! - **Deterministic**: same input always produces same output
//! - **Total**: canonicalizing decoded data never fails
//! - **Non-mutating**: the input sequence is left untouched

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::encoder::{self, WIRE_FORMAT_VERSION};
use crate::model::{ContainerDefinition, ContainerDefinitions, PortMapping, TransportProtocol};
use crate::zero::{compact_sparse_list, IsZero};
use crate::Result;

/// Apply `$apply` to every sparse list field of a container definition
macro_rules! each_sparse_list {
    ($def:expr, $apply:ident) => {
        $apply(&mut $def.command);
        $apply(&mut $def.credential_specs);
        $apply(&mut $def.depends_on);
        $apply(&mut $def.dns_search_domains);
        $apply(&mut $def.dns_servers);
        $apply(&mut $def.docker_security_options);
        $apply(&mut $def.entry_point);
        $apply(&mut $def.environment);
        $apply(&mut $def.environment_files);
        $apply(&mut $def.extra_hosts);
        $apply(&mut $def.links);
        $apply(&mut $def.mount_points);
        $apply(&mut $def.port_mappings);
        $apply(&mut $def.resource_requirements);
        $apply(&mut $def.secrets);
        $apply(&mut $def.system_controls);
        $apply(&mut $def.ulimits);
        $apply(&mut $def.volumes_from);
    };
}

// ── Public API ─────────────────────────────────────────────

/// Normalize container definitions text to canonical text
///
/// Pipeline: decode → normalize → encode
///
/// # Errors
/// Returns `Decode` for malformed input or `Encode` if the canonical form
/// cannot be serialized.
pub fn normalize(text: &str, is_awsvpc: bool) -> Result<String> {
    let defs = crate::parser::decode("input", text)?;
    let canonical = normalize_definitions(&defs, is_awsvpc);
    encoder::render(&canonical)
}

/// Build the canonical form of a decoded sequence
///
/// Steps, in order:
/// 1. Sort containers by name
/// 2. Sort each container's environment variables by name
/// 3. Sort each container's secrets by name
/// 4. Remove zero-valued entries from every sparse list
/// 5. Fill defaults (`essential`, port mappings) and drop absent-equivalent
///    lists
///
/// All sorts are stable, so entries with equal keys keep decode order.
pub fn normalize_definitions(defs: &[ContainerDefinition], is_awsvpc: bool) -> ContainerDefinitions {
    let mut out = defs.to_vec();

    // ── Step 1: Order containers ───────────────────────
    out.sort_by(|a, b| a.name_key().cmp(b.name_key()));

    for def in &mut out {
        // ── Step 2: Order environment variables ────────
        if let Some(ref mut env) = def.environment {
            env.sort_by(|a, b| a.name_key().cmp(b.name_key()));
        }

        // ── Step 3: Order secrets ──────────────────────
        if let Some(ref mut secrets) = def.secrets {
            secrets.sort_by(|a, b| a.name_key().cmp(b.name_key()));
        }

        // ── Step 4: Compact sparse lists ───────────────
        each_sparse_list!(def, compact_sparse_list);

        // ── Step 5: Defaults and empty-list collapse ───
        if def.essential.is_none() {
            def.essential = Some(true);
        }
        if let Some(ref mut mappings) = def.port_mappings {
            for pm in mappings.iter_mut() {
                normalize_port_mapping(pm, is_awsvpc);
            }
            // A mapping carrying only defaults is now a placeholder
            mappings.retain(|pm| !pm.is_zero());
        }
        each_sparse_list!(def, collapse_empty_list);
    }

    debug!(containers = out.len(), is_awsvpc, "normalized container definitions");
    out
}

/// Encode an already-normalized sequence as canonical text
pub fn serialize_canonical(defs: &ContainerDefinitions) -> Result<String> {
    encoder::render(defs)
}

// ── Helpers ────────────────────────────────────────────────

fn normalize_port_mapping(pm: &mut PortMapping, is_awsvpc: bool) {
    if pm.protocol == Some(TransportProtocol::Tcp) {
        pm.protocol = None;
    }
    if pm.host_port == Some(0) {
        pm.host_port = None;
    }
    if is_awsvpc && pm.host_port.is_none() {
        pm.host_port = pm.container_port;
    }
}

fn collapse_empty_list<T>(list: &mut Option<Vec<T>>) {
    if matches!(list, Some(items) if items.is_empty()) {
        *list = None;
    }
}

// ── SHA-256 Hash Computation ──────────────────────────────

/// Compute the SHA-256 semantic hash of a normalized sequence
///
/// The digest covers the wire format revision and the canonical encoding,
/// so two documents hash equal exactly when they are equivalent under the
/// same network mode.
pub fn compute_semantic_hash(defs: &ContainerDefinitions) -> Result<String> {
    let bytes = encoder::encode(defs)?;
    let mut hasher = Sha256::new();
    hasher.update(format!("ecsdef-wire-v{}\n", WIRE_FORMAT_VERSION).as_bytes());
    hasher.update(&bytes);
    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}
