//! Integration tests for the ecsdef CLI
//!
//! These tests invoke the actual ecsdef-cli binary and verify:
//! - Exit codes (0 = success/equivalent, 1 = invalid/not equivalent, 2 = error)
//! - stdout/stderr output
//! - JSON output format
//! - All commands work end-to-end

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use tempfile::NamedTempFile;

// ── Helpers ───────────────────────────────────────────────

fn ecsdef_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ecsdef-cli"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name)
}

fn fixture_arg(name: &str) -> String {
    fixture(name).to_str().unwrap().to_string()
}

fn temp_document(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

fn run_ecsdef(args: &[&str]) -> std::process::Output {
    Command::new(ecsdef_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to execute ecsdef-cli")
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

// ── Version ───────────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run_ecsdef(&["version"]);
    assert!(output.status.success(), "version should exit 0");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("ecsdef"), "should contain 'ecsdef'");
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "should contain version"
    );
    assert!(stdout.contains("wire format v1"));
}

#[test]
fn test_version_flag() {
    let output = run_ecsdef(&["--version"]);
    assert!(output.status.success(), "--version should exit 0");
    assert!(stdout_of(&output).contains(env!("CARGO_PKG_VERSION")));
}

// ── Validate ──────────────────────────────────────────────

#[test]
fn test_validate_valid_document() {
    let output = run_ecsdef(&["validate", &fixture_arg("declared/web-app.json")]);
    assert!(output.status.success(), "valid document should exit 0");
    assert!(stdout_of(&output).contains("valid"), "should mention valid");
}

#[test]
fn test_validate_zero_record() {
    let output = run_ecsdef(&["validate", &fixture_arg("invalid/zero-record.json")]);
    assert_eq!(output.status.code(), Some(1), "zero record should exit 1");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("index (1)"), "should name the index: {}", stderr);
}

#[test]
fn test_validate_duplicate_names() {
    let output = run_ecsdef(&["validate", &fixture_arg("invalid/duplicate-names.json")]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("duplicate-name"));
}

#[test]
fn test_validate_malformed_document() {
    let output = run_ecsdef(&["validate", &fixture_arg("invalid/not-json.json")]);
    assert_eq!(output.status.code(), Some(2), "decode failure should exit 2");
}

#[test]
fn test_validate_nonexistent_file() {
    let output = run_ecsdef(&["validate", "nonexistent.json"]);
    assert_eq!(output.status.code(), Some(2), "missing file should exit 2");
}

#[test]
fn test_validate_json_output() {
    let output = run_ecsdef(&["validate", "--json", &fixture_arg("declared/web-app.json")]);
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&stdout_of(&output)).expect("should be valid JSON");
    assert_eq!(json["valid"], true);
    assert_eq!(json["errors"], 0);
    assert_eq!(json["containers"], 2);
}

#[test]
fn test_validate_json_invalid() {
    let output = run_ecsdef(&[
        "validate",
        "--json",
        &fixture_arg("invalid/duplicate-names.json"),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_str(&stdout_of(&output)).expect("should be valid JSON");
    assert_eq!(json["valid"], false);
    assert_eq!(json["diagnostics"][0]["kind"], "duplicate-name");
    assert_eq!(json["diagnostics"][0]["index"], 1);
}

#[test]
fn test_validate_quiet_valid() {
    let output = run_ecsdef(&["--quiet", "validate", &fixture_arg("declared/web-app.json")]);
    assert!(output.status.success());
    assert!(stdout_of(&output).is_empty(), "quiet mode should produce no stdout");
}

// ── Normalize ─────────────────────────────────────────────

#[test]
fn test_normalize_awsvpc_matches_snapshot() {
    let output = run_ecsdef(&[
        "normalize",
        "--network-mode",
        "awsvpc",
        &fixture_arg("observed/web-app.json"),
    ]);
    assert!(output.status.success(), "normalize should exit 0");
    let expected = std::fs::read_to_string(fixture("expected/web-app.canonical.awsvpc.json"))
        .expect("read snapshot");
    assert_eq!(stdout_of(&output).trim_end(), expected.trim_end());
}

#[test]
fn test_normalize_idempotent() {
    let output1 = run_ecsdef(&["normalize", &fixture_arg("declared/web-app.json")]);
    assert!(output1.status.success());
    let canonical1 = stdout_of(&output1);

    let temp = temp_document(&canonical1);
    let output2 = run_ecsdef(&["normalize", temp.path().to_str().unwrap()]);
    assert!(output2.status.success());
    assert_eq!(canonical1, stdout_of(&output2), "normalize must be idempotent");
}

#[test]
fn test_normalize_invalid_network_mode() {
    let output = run_ecsdef(&[
        "normalize",
        "--network-mode",
        "overlay",
        &fixture_arg("declared/web-app.json"),
    ]);
    assert_eq!(output.status.code(), Some(2), "clap usage errors exit 2");
}

#[test]
fn test_normalize_malformed_document() {
    let output = run_ecsdef(&["normalize", &fixture_arg("invalid/not-json.json")]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Decode error"), "stderr: {}", stderr);
}

#[test]
fn test_normalize_rejects_zero_record() {
    let output = run_ecsdef(&["normalize", &fixture_arg("invalid/zero-record.json")]);
    assert_eq!(output.status.code(), Some(1), "zero record should exit 1 like hash");
    assert!(stdout_of(&output).is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("index (1)"), "stderr: {}", stderr);
}

// ── Render ────────────────────────────────────────────────

#[test]
fn test_render_matches_snapshot() {
    let output = run_ecsdef(&["render", &fixture_arg("declared/web-app.json")]);
    assert!(output.status.success());
    let expected =
        std::fs::read_to_string(fixture("expected/web-app.rendered.json")).expect("read snapshot");
    assert_eq!(stdout_of(&output).trim_end(), expected.trim_end());
}

// ── Hash ──────────────────────────────────────────────────

#[test]
fn test_hash_is_sha256_hex() {
    let output = run_ecsdef(&["hash", &fixture_arg("declared/web-app.json")]);
    assert!(output.status.success(), "hash should exit 0");
    let hash = stdout_of(&output).trim().to_string();
    assert_eq!(hash.len(), 64, "SHA-256 hash should be 64 hex chars");
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()), "hash should be hex");
}

#[test]
fn test_hash_equal_for_equivalent_documents() {
    let hash = |name: &str| {
        let output = run_ecsdef(&["hash", "--network-mode", "awsvpc", &fixture_arg(name)]);
        assert!(output.status.success());
        stdout_of(&output).trim().to_string()
    };
    assert_eq!(hash("declared/web-app.json"), hash("observed/web-app.json"));
}

// ── Equivalent ────────────────────────────────────────────

#[test]
fn test_equivalent_awsvpc() {
    let output = run_ecsdef(&[
        "equivalent",
        "--network-mode",
        "awsvpc",
        &fixture_arg("declared/web-app.json"),
        &fixture_arg("observed/web-app.json"),
    ]);
    assert!(output.status.success(), "equivalent documents exit 0");
    assert!(stdout_of(&output).contains("equivalent"));
}

#[test]
fn test_not_equivalent_bridge() {
    let output = run_ecsdef(&[
        "equivalent",
        &fixture_arg("declared/web-app.json"),
        &fixture_arg("observed/web-app.json"),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).contains("not equivalent"));
}

#[test]
fn test_equivalent_json_output() {
    let a = temp_document(r#"[{"name":"b","essential":true},{"name":"a"}]"#);
    let b = temp_document(r#"[{"name":"a","essential":true},{"name":"b","essential":true}]"#);
    let output = run_ecsdef(&[
        "equivalent",
        "--json",
        a.path().to_str().unwrap(),
        b.path().to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&stdout_of(&output)).expect("should be valid JSON");
    assert_eq!(json["equivalent"], true);
    assert_eq!(json["network_mode"], "bridge");
}

#[test]
fn test_equivalent_malformed_second_input() {
    let b = temp_document("[{");
    let output = run_ecsdef(&[
        "equivalent",
        &fixture_arg("declared/web-app.json"),
        b.path().to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(b.path().to_str().unwrap()), "stderr: {}", stderr);
}

// ── Diff ──────────────────────────────────────────────────

#[test]
fn test_diff_no_differences() {
    let output = run_ecsdef(&[
        "diff",
        "--network-mode",
        "awsvpc",
        &fixture_arg("declared/web-app.json"),
        &fixture_arg("observed/web-app.json"),
    ]);
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("no semantic differences"));
}

#[test]
fn test_diff_lists_changes() {
    let a = temp_document(r#"[{"name":"api","image":"v1"},{"name":"db"}]"#);
    let b = temp_document(r#"[{"name":"api","image":"v2"},{"name":"cache"}]"#);
    let output = run_ecsdef(&["diff", a.path().to_str().unwrap(), b.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("~ api"));
    assert!(stdout.contains("+ cache"));
    assert!(stdout.contains("- db"));
}

#[test]
fn test_diff_malformed_second_input_names_it() {
    let b = temp_document("[{");
    let output = run_ecsdef(&[
        "diff",
        &fixture_arg("declared/web-app.json"),
        b.path().to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(b.path().to_str().unwrap()), "stderr: {}", stderr);
    assert!(!stderr.contains("web-app.json"), "stderr: {}", stderr);
}

// ── Logging ───────────────────────────────────────────────

#[test]
fn test_verbose_logs_to_stderr_only() {
    let output = run_ecsdef(&[
        "--verbose",
        "equivalent",
        "--json",
        &fixture_arg("declared/web-app.json"),
        &fixture_arg("declared/web-app.json"),
    ]);
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&stdout_of(&output)).expect("stdout stays pure JSON");
    assert_eq!(json["equivalent"], true);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("compared container definitions"), "stderr: {}", stderr);
}
