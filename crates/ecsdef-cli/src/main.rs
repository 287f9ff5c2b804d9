use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use ecsdef_core::equivalence::{definitions_are_equivalent, diff_definitions};
use ecsdef_core::normalizer::{compute_semantic_hash, normalize_definitions, serialize_canonical};
use ecsdef_core::verifier::verify;
use ecsdef_core::{parse, render, NetworkMode};
use tracing_subscriber::EnvFilter;

/// ecsdef — ECS container definitions toolkit
///
/// Validate, normalize, hash, and compare container definitions documents.
#[derive(Parser)]
#[command(name = "ecsdef", version, about, long_about = None)]
struct Cli {
    /// Suppress normal output (exit code only)
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Log debug events to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a container definitions document
    Validate {
        /// Path to .json file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the canonical form of a document
    Normalize {
        /// Path to .json file
        file: PathBuf,
        /// Task network mode (bridge, host, awsvpc, none)
        #[arg(long, default_value = "bridge")]
        network_mode: NetworkMode,
    },

    /// Re-encode a document in API wire form without canonicalizing
    Render {
        /// Path to .json file
        file: PathBuf,
    },

    /// Compute semantic hash (SHA-256) of a document
    Hash {
        /// Path to .json file
        file: PathBuf,
        /// Task network mode (bridge, host, awsvpc, none)
        #[arg(long, default_value = "bridge")]
        network_mode: NetworkMode,
    },

    /// List containers that differ between two documents
    Diff {
        /// First .json file
        file_a: PathBuf,
        /// Second .json file
        file_b: PathBuf,
        /// Task network mode (bridge, host, awsvpc, none)
        #[arg(long, default_value = "bridge")]
        network_mode: NetworkMode,
    },

    /// Check whether two documents are equivalent
    Equivalent {
        /// First .json file
        file_a: PathBuf,
        /// Second .json file
        file_b: PathBuf,
        /// Task network mode (bridge, host, awsvpc, none)
        #[arg(long, default_value = "bridge")]
        network_mode: NetworkMode,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Validate { file, json } => cmd_validate(&file, json, cli.quiet),
        Commands::Normalize { file, network_mode } => cmd_normalize(&file, network_mode, cli.quiet),
        Commands::Render { file } => cmd_render(&file, cli.quiet),
        Commands::Hash { file, network_mode } => cmd_hash(&file, network_mode, cli.quiet),
        Commands::Diff {
            file_a,
            file_b,
            network_mode,
        } => cmd_diff(&file_a, &file_b, network_mode, cli.quiet),
        Commands::Equivalent {
            file_a,
            file_b,
            network_mode,
            json,
        } => cmd_equivalent(&file_a, &file_b, network_mode, json, cli.quiet),
        Commands::Version => {
            if !cli.quiet {
                println!(
                    "ecsdef {} (ecsdef-core {}, wire format v{})",
                    env!("CARGO_PKG_VERSION"),
                    env!("CARGO_PKG_VERSION"),
                    ecsdef_core::encoder::WIRE_FORMAT_VERSION
                );
            }
            0
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default = if verbose { "ecsdef_core=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

// ── Helpers ───────────────────────────────────────────────

fn read_file(path: &Path) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|e| {
        eprintln!("{} {}: {}", "error:".red().bold(), path.display(), e);
        2
    })
}

fn report_error(path: &Path, err: &ecsdef_core::Error) -> i32 {
    eprintln!("{} {}: {}", "error:".red().bold(), path.display(), err);
    match err {
        ecsdef_core::Error::Validation { .. } => 1,
        _ => 2,
    }
}

/// Pick which of two compared files a core error refers to
fn failing_path<'a>(err: &ecsdef_core::Error, path_a: &'a Path, path_b: &'a Path) -> &'a Path {
    match err {
        ecsdef_core::Error::Decode { input, .. } if input == "b" => path_b,
        _ => path_a,
    }
}

// ── Commands ──────────────────────────────────────────────

fn cmd_validate(path: &Path, json: bool, quiet: bool) -> i32 {
    let text = match read_file(path) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let defs = match parse(&text) {
        Ok(defs) => defs,
        Err(e) => {
            if json {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": 1,
                    "warnings": 0,
                    "diagnostics": [{"severity": "error", "kind": "parse", "message": e.to_string()}],
                });
                println!("{}", output);
            }
            return report_error(path, &e);
        }
    };

    let result = verify(&defs);

    if json {
        let diagnostics: Vec<serde_json::Value> = result
            .diagnostics
            .iter()
            .map(|d| {
                serde_json::json!({
                    "severity": if d.severity == ecsdef_core::verifier::Severity::Error { "error" } else { "warning" },
                    "kind": d.kind.to_string(),
                    "message": d.message,
                    "index": d.index,
                })
            })
            .collect();
        let output = serde_json::json!({
            "valid": result.is_valid(),
            "containers": defs.len(),
            "errors": result.errors().len(),
            "warnings": result.warnings().len(),
            "diagnostics": diagnostics,
        });
        println!("{}", output);
    } else {
        for d in &result.diagnostics {
            eprintln!("{}", d.to_string().yellow());
        }
        if !quiet && result.is_valid() {
            println!(
                "{} {} ({} containers)",
                "valid".green().bold(),
                path.display(),
                defs.len()
            );
        }
        if !result.is_valid() {
            eprintln!(
                "{} {} error(s) in {}",
                "error:".red().bold(),
                result.errors().len(),
                path.display()
            );
        }
    }

    if result.is_valid() {
        0
    } else {
        1
    }
}

fn cmd_normalize(path: &Path, mode: NetworkMode, quiet: bool) -> i32 {
    let text = match read_file(path) {
        Ok(t) => t,
        Err(code) => return code,
    };
    let canonical = parse(&text)
        .and_then(|defs| serialize_canonical(&normalize_definitions(&defs, mode.is_awsvpc())));
    match canonical {
        Ok(canonical) => {
            if !quiet {
                println!("{}", canonical);
            }
            0
        }
        Err(e) => report_error(path, &e),
    }
}

fn cmd_render(path: &Path, quiet: bool) -> i32 {
    let text = match read_file(path) {
        Ok(t) => t,
        Err(code) => return code,
    };
    match parse(&text).and_then(|defs| render(&defs)) {
        Ok(rendered) => {
            if !quiet {
                println!("{}", rendered);
            }
            0
        }
        Err(e) => report_error(path, &e),
    }
}

fn cmd_hash(path: &Path, mode: NetworkMode, quiet: bool) -> i32 {
    let text = match read_file(path) {
        Ok(t) => t,
        Err(code) => return code,
    };
    let hash = parse(&text)
        .and_then(|defs| compute_semantic_hash(&normalize_definitions(&defs, mode.is_awsvpc())));
    match hash {
        Ok(hash) => {
            if !quiet {
                println!("{}", hash);
            }
            0
        }
        Err(e) => report_error(path, &e),
    }
}

fn cmd_diff(path_a: &Path, path_b: &Path, mode: NetworkMode, quiet: bool) -> i32 {
    let (a, b) = match (read_file(path_a), read_file(path_b)) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(code), _) | (_, Err(code)) => return code,
    };
    let changes = match diff_definitions(&a, &b, mode.is_awsvpc()) {
        Ok(changes) => changes,
        Err(e) => return report_error(failing_path(&e, path_a, path_b), &e),
    };
    if !quiet {
        if changes.is_empty() {
            println!("{}", "no semantic differences".green());
        }
        for change in &changes {
            let line = change.to_string();
            let line = match change {
                ecsdef_core::equivalence::ContainerChange::Added(_) => line.green(),
                ecsdef_core::equivalence::ContainerChange::Removed(_) => line.red(),
                ecsdef_core::equivalence::ContainerChange::Changed(_) => line.yellow(),
            };
            println!("{}", line);
        }
    }
    if changes.is_empty() {
        0
    } else {
        1
    }
}

fn cmd_equivalent(path_a: &Path, path_b: &Path, mode: NetworkMode, json: bool, quiet: bool) -> i32 {
    let (a, b) = match (read_file(path_a), read_file(path_b)) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(code), _) | (_, Err(code)) => return code,
    };
    tracing::debug!(a = %path_a.display(), b = %path_b.display(), network_mode = %mode, "comparing");
    let equivalent = match definitions_are_equivalent(&a, &b, mode.is_awsvpc()) {
        Ok(eq) => eq,
        Err(e) => return report_error(failing_path(&e, path_a, path_b), &e),
    };
    if json {
        let output = serde_json::json!({
            "equivalent": equivalent,
            "network_mode": mode.to_string(),
        });
        println!("{}", output);
    } else if !quiet {
        if equivalent {
            println!("{}", "equivalent".green().bold());
        } else {
            println!("{}", "not equivalent".red().bold());
        }
    }
    if equivalent {
        0
    } else {
        1
    }
}
