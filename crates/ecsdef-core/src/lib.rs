//! ecsdef Core - semantic equivalence for ECS container definitions
//!
//! Decides whether two container definitions documents describe the same
//! configuration, even though the control plane reorders containers and
//! environment variables, fills in defaults, and returns empty lists as
//! either `[]` or nothing at all.
//!
//! # Architecture
//!
//! ```text
//! JSON text → Decoder → ContainerDefinitions → Normalizer → Canonical Form
//!                              ↓                               ↓
//!                           Verifier                        Encoder → bytes / SHA-256
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: same input always produces identical output
//! - **Canonical**: equivalent documents encode to identical bytes
//! - **Pure**: no I/O, no shared state; safe to call from any thread

pub mod encoder;
pub mod equivalence;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod verifier;
pub mod zero;

pub use encoder::render;
pub use equivalence::definitions_are_equivalent;
pub use error::{Error, Result};
pub use model::*;
pub use normalizer::{normalize, normalize_definitions};
pub use parser::parse;

#[cfg(test)]
mod tests {
    use super::*;

    const WEB_AND_DB: &str = r#"[
        {"name":"web","image":"nginx:1.27","cpu":256,"memory":512,
         "portMappings":[{"containerPort":80,"protocol":"tcp"}],
         "environment":[{"name":"MODE","value":"prod"},{"name":"LOG","value":"info"}],
         "secrets":[{"name":"DB_PASSWORD","valueFrom":"arn:aws:ssm:us-east-1:123456789012:parameter/db"}],
         "dependsOn":[{"containerName":"db","condition":"HEALTHY"}]},
        {"name":"db","image":"postgres:16","essential":true,
         "mountPoints":[{"sourceVolume":"pgdata","containerPath":"/var/lib/postgresql/data"}]}
    ]"#;

    #[test]
    fn test_parse_render_round_trip() {
        let defs = parse(WEB_AND_DB).unwrap();
        let rendered = render(&defs).unwrap();
        let reparsed = parse(&rendered).unwrap();
        assert_eq!(defs, reparsed);
    }

    #[test]
    fn test_rendered_text_is_equivalent_to_source() {
        let rendered = render(&parse(WEB_AND_DB).unwrap()).unwrap();
        assert!(definitions_are_equivalent(WEB_AND_DB, &rendered, false).unwrap());
        assert!(definitions_are_equivalent(WEB_AND_DB, &rendered, true).unwrap());
    }

    #[test]
    fn test_normalized_text_is_equivalent_to_source() {
        let normalized = normalize(WEB_AND_DB, true).unwrap();
        assert!(definitions_are_equivalent(WEB_AND_DB, &normalized, true).unwrap());
    }

    #[test]
    fn test_determinism_100_iterations() {
        let first = normalize(WEB_AND_DB, false).unwrap();
        for i in 0..100 {
            let result = normalize(WEB_AND_DB, false).unwrap();
            assert_eq!(first, result, "Non-determinism at iteration {}", i);
        }
    }
}
