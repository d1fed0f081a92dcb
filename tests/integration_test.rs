// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn bumpversion(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bumpversion"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute bumpversion")
}

fn project(config: &str, version_file: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bumpversion.toml"), config).unwrap();
    fs::write(dir.path().join("VERSION"), version_file).unwrap();
    dir
}

const SEMVER_CONFIG: &str = r#"[bumpversion]
current_version = "0.1.0"
schema = "semver"

[[bumpversion.file]]
path = "VERSION"
"#;

#[test]
fn test_bumpversion_help() {
    let dir = TempDir::new().unwrap();
    let output = bumpversion(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("bumpversion"));
    assert!(stdout.contains("--new-version"));
}

#[test]
fn test_bumpversion_version() {
    let dir = TempDir::new().unwrap();
    let output = bumpversion(dir.path(), &["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_requires_parts_or_new_version() {
    let dir = project(SEMVER_CONFIG, "0.1.0\n");
    let output = bumpversion(dir.path(), &[]);
    assert!(!output.status.success());

    let output = bumpversion(dir.path(), &["minor", "--new-version", "1.0.0"]);
    assert!(!output.status.success());
}

#[test]
fn test_bump_rewrites_files_and_config() {
    let dir = project(SEMVER_CONFIG, "0.1.0\n");
    let output = bumpversion(dir.path(), &["minor"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("VERSION")).unwrap(),
        "0.2.0\n"
    );
    let config = fs::read_to_string(dir.path().join("bumpversion.toml")).unwrap();
    assert!(config.contains(r#"current_version = "0.2.0""#));
}

#[test]
fn test_dry_run_leaves_files() {
    let dir = project(SEMVER_CONFIG, "0.1.0\n");
    let output = bumpversion(dir.path(), &["--dry-run", "major"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("1.0.0"));
    assert_eq!(
        fs::read_to_string(dir.path().join("VERSION")).unwrap(),
        "0.1.0\n"
    );
}

#[test]
fn test_schema_override() {
    let dir = project(
        "[bumpversion]\ncurrent_version = \"1.0rc1\"\nschema = \"semver\"\n\n[[bumpversion.file]]\npath = \"VERSION\"\n",
        "1.0rc1\n",
    );
    let output = bumpversion(dir.path(), &["--schema", "pep440", "pre"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("VERSION")).unwrap(),
        "1.0rc2\n"
    );
}

#[test]
fn test_missing_pattern_exits_with_error() {
    let dir = project(SEMVER_CONFIG, "nothing to see\n");
    let output = bumpversion(dir.path(), &["patch"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("VERSION"));
}

#[test]
fn test_commit_outside_repository_fails() {
    let dir = project(SEMVER_CONFIG, "0.1.0\n");
    let output = bumpversion(dir.path(), &["--commit", "patch"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        fs::read_to_string(dir.path().join("VERSION")).unwrap(),
        "0.1.0\n"
    );
}

#[test]
fn test_invalid_current_version() {
    let dir = project(SEMVER_CONFIG, "0.1.0\n");
    let output = bumpversion(dir.path(), &["--current-version", "not-a-version", "patch"]);

    assert_eq!(output.status.code(), Some(1));
}
