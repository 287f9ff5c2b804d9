//! Definitions verifier — checks a decoded document for structural problems
//!
//! The canonicalizer is total and never rejects input, so problems like two
//! containers sharing a name would otherwise go unnoticed. The verifier
//! reports them, accumulating every diagnostic rather than stopping at the
//! first one.
//!
//! # Verification Phases
//!
//! 1. **Names** — every container named, no duplicates
//! 2. **Essential** — at least one container is essential
//! 3. **References** — `dependsOn`, `links` and `volumesFrom` name real containers
//! 4. **Ports** — port numbers fit in 0..=65535
//!
//! The equivalence predicate never runs the verifier.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ContainerDefinition, ContainerDefinitions};

const MAX_PORT: i32 = 65535;

// ── Verification Result Types ─────────────────────────────

/// Result of verification — accumulates all diagnostics
#[derive(Debug, Clone, Default)]
pub struct VerificationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl VerificationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no errors were found (warnings are OK)
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Returns only error-level diagnostics
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect()
    }

    /// Returns only warning-level diagnostics
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect()
    }

    fn add_error(&mut self, kind: DiagnosticKind, message: String, index: Option<usize>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            kind,
            message,
            index,
        });
    }

    fn add_warning(&mut self, kind: DiagnosticKind, message: String, index: Option<usize>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            kind,
            message,
            index,
        });
    }
}

/// A single verification diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    /// Position of the offending container in the document, if any
    pub index: Option<usize>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if let Some(index) = self.index {
            write!(f, "{} [{}] at index {}: {}", prefix, self.kind, index, self.message)
        } else {
            write!(f, "{} [{}]: {}", prefix, self.kind, self.message)
        }
    }
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Category of verification issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    MissingName,
    DuplicateName,
    NoEssentialContainer,
    UnknownReference,
    InvalidPort,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DiagnosticKind::MissingName => write!(f, "missing-name"),
            DiagnosticKind::DuplicateName => write!(f, "duplicate-name"),
            DiagnosticKind::NoEssentialContainer => write!(f, "no-essential"),
            DiagnosticKind::UnknownReference => write!(f, "unknown-reference"),
            DiagnosticKind::InvalidPort => write!(f, "invalid-port"),
        }
    }
}

// ── Public API ────────────────────────────────────────────

/// Verify decoded container definitions.
///
/// Runs all verification phases and returns accumulated diagnostics.
pub fn verify(defs: &ContainerDefinitions) -> VerificationResult {
    let mut result = VerificationResult::new();

    verify_names(defs, &mut result);
    verify_essential(defs, &mut result);
    verify_references(defs, &mut result);
    verify_ports(defs, &mut result);

    result
}

// ── Phase 1: Names ───────────────────────────────────────

fn verify_names(defs: &ContainerDefinitions, result: &mut VerificationResult) {
    let mut first_seen: BTreeMap<&str, usize> = BTreeMap::new();
    for (i, def) in defs.iter().enumerate() {
        let name = def.name_key();
        if name.is_empty() {
            result.add_error(
                DiagnosticKind::MissingName,
                "container definition has no name".to_string(),
                Some(i),
            );
            continue;
        }
        if let Some(first) = first_seen.get(name) {
            result.add_error(
                DiagnosticKind::DuplicateName,
                format!("container name '{}' already used at index {}", name, first),
                Some(i),
            );
        } else {
            first_seen.insert(name, i);
        }
    }
}

// ── Phase 2: Essential ───────────────────────────────────

fn verify_essential(defs: &ContainerDefinitions, result: &mut VerificationResult) {
    if !defs.is_empty() && !defs.iter().any(ContainerDefinition::is_essential) {
        result.add_error(
            DiagnosticKind::NoEssentialContainer,
            "at least one container must be essential".to_string(),
            None,
        );
    }
}

// ── Phase 3: References ──────────────────────────────────

fn verify_references(defs: &ContainerDefinitions, result: &mut VerificationResult) {
    let names: BTreeSet<&str> = defs.iter().map(|d| d.name_key()).collect();

    for (i, def) in defs.iter().enumerate() {
        let mut check = |target: &str, via: &str| {
            if !target.is_empty() && !names.contains(target) {
                result.add_warning(
                    DiagnosticKind::UnknownReference,
                    format!("{} references unknown container '{}'", via, target),
                    Some(i),
                );
            }
        };

        for dep in def.depends_on.iter().flatten() {
            check(dep.container_name.as_deref().unwrap_or(""), "dependsOn");
        }
        for link in def.links.iter().flatten() {
            // `name:alias` links to `name`
            let target = link.split(':').next().unwrap_or("");
            check(target, "links");
        }
        for vol in def.volumes_from.iter().flatten() {
            check(vol.source_container.as_deref().unwrap_or(""), "volumesFrom");
        }
    }
}

// ── Phase 4: Ports ───────────────────────────────────────

fn verify_ports(defs: &ContainerDefinitions, result: &mut VerificationResult) {
    for (i, def) in defs.iter().enumerate() {
        for pm in def.port_mappings.iter().flatten() {
            for (label, port) in [("containerPort", pm.container_port), ("hostPort", pm.host_port)] {
                if let Some(port) = port {
                    if !(0..=MAX_PORT).contains(&port) {
                        result.add_error(
                            DiagnosticKind::InvalidPort,
                            format!("{} {} outside 0..={}", label, port, MAX_PORT),
                            Some(i),
                        );
                    }
                }
            }
        }
    }
}
