use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_id-context")
}

/// Writes a navigation-style schema: required site, unbounded node chain,
/// leading separator required.
fn write_navigation_schema(dir: &TempDir) -> PathBuf {
    let json = serde_json::json!({
        "name": "navigation",
        "separator": { "literal": "/" },
        "require_separator_first": true,
        "components": [
            { "name": "site", "pattern": "\\w+" },
            { "name": "node", "cardinality": "required_unbounded_hierarchical", "pattern": "\\w+" }
        ]
    });
    let path = dir.path().join("navigation.json");
    fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).expect("failed to write schema");
    path
}

fn write_broken_schema(dir: &TempDir) -> PathBuf {
    // Two components, no separator: rejected at build time.
    let json = serde_json::json!({
        "name": "broken",
        "components": [
            { "name": "a", "pattern": ".*" },
            { "name": "b", "pattern": ".*" }
        ]
    });
    let path = dir.path().join("broken.json");
    fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).expect("failed to write schema");
    path
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_accepts_well_formed_schema() {
    let dir = TempDir::new().unwrap();
    let schema = write_navigation_schema(&dir);

    let out = Command::new(bin())
        .args(["check", schema.to_str().unwrap()])
        .output()
        .expect("failed to run id-context");

    assert!(out.status.success(), "check should succeed");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("Checked 1 schema file(s)."),
        "stdout: {stdout}"
    );
}

#[test]
fn check_rejects_contradictory_schema() {
    let dir = TempDir::new().unwrap();
    let schema = write_broken_schema(&dir);

    let out = Command::new(bin())
        .args(["check", schema.to_str().unwrap()])
        .output()
        .expect("failed to run id-context");

    assert!(!out.status.success(), "check should fail");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("no separator"), "stderr: {stderr}");
}

#[test]
fn check_accepts_yaml_schema() {
    let dir = TempDir::new().unwrap();
    let yaml = r#"name: page
separator:
  literal: "."
components:
  - name: site
    pattern: "\\w+"
  - name: page
    cardinality: optional
    pattern: "\\w+"
"#;
    let path = dir.path().join("page.yaml");
    fs::write(&path, yaml).unwrap();

    let out = Command::new(bin())
        .args(["check", path.to_str().unwrap()])
        .output()
        .expect("failed to run id-context");

    assert!(out.status.success(), "yaml check should succeed");
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_emits_component_tokens_as_json() {
    let dir = TempDir::new().unwrap();
    let schema = write_navigation_schema(&dir);

    let out = Command::new(bin())
        .args([
            "parse",
            "--schema",
            schema.to_str().unwrap(),
            "--format",
            "json",
            "/classic/home/news",
        ])
        .output()
        .expect("failed to run id-context");

    assert!(out.status.success(), "parse should succeed");
    let stdout = String::from_utf8_lossy(&out.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(parsed[0]["identifier"], "/classic/home/news");
    assert_eq!(
        parsed[0]["components"],
        serde_json::json!(["classic", "home", "news"])
    );
}

#[test]
fn parse_fails_without_required_leading_separator() {
    let dir = TempDir::new().unwrap();
    let schema = write_navigation_schema(&dir);

    let out = Command::new(bin())
        .args([
            "parse",
            "--schema",
            schema.to_str().unwrap(),
            "classic/home",
        ])
        .output()
        .expect("failed to run id-context");

    assert!(!out.status.success(), "parse should fail");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("must start with separator"),
        "stderr: {stderr}"
    );
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_conforming_identifiers() {
    let dir = TempDir::new().unwrap();
    let schema = write_navigation_schema(&dir);

    let out = Command::new(bin())
        .args([
            "validate",
            "--schema",
            schema.to_str().unwrap(),
            "/classic/home",
            "/classic/home/news",
        ])
        .output()
        .expect("failed to run id-context");

    assert!(out.status.success(), "validate should succeed");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("Validated 2 identifier(s), 0 failure(s)."),
        "stdout: {stdout}"
    );
}

#[test]
fn validate_reports_starved_hierarchical_component() {
    let dir = TempDir::new().unwrap();
    let schema = write_navigation_schema(&dir);

    // Only the site token: the node chain never gets its minimum one token.
    let out = Command::new(bin())
        .args(["validate", "--schema", schema.to_str().unwrap(), "/classic"])
        .output()
        .expect("failed to run id-context");

    assert!(!out.status.success(), "validate should fail");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("requires at least one matching token"),
        "stdout: {stdout}"
    );
}

// ---------------------------------------------------------------------------
// inspect / format
// ---------------------------------------------------------------------------

#[test]
fn inspect_prints_component_table() {
    let dir = TempDir::new().unwrap();
    let schema = write_navigation_schema(&dir);

    let out = Command::new(bin())
        .args(["inspect", "--schema", schema.to_str().unwrap()])
        .output()
        .expect("failed to run id-context");

    assert!(out.status.success(), "inspect should succeed");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Context: navigation"), "stdout: {stdout}");
    assert!(stdout.contains("[0] site (required)"), "stdout: {stdout}");
    assert!(
        stdout.contains("[1] node (required, unbounded)"),
        "stdout: {stdout}"
    );
}

#[test]
fn format_joins_components_with_leading_separator() {
    let dir = TempDir::new().unwrap();
    let schema = write_navigation_schema(&dir);

    let out = Command::new(bin())
        .args([
            "format",
            "--schema",
            schema.to_str().unwrap(),
            "classic",
            "home",
        ])
        .output()
        .expect("failed to run id-context");

    assert!(out.status.success(), "format should succeed");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.trim(), "/classic/home");
}
