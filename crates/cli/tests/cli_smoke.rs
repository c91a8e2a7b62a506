//! CLI tests for envedit.
//!
//! These run the real binary against files in a temporary directory and check
//! file content, output, and exit codes.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the envedit binary.
fn envedit_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("envedit");
  cmd.env_remove("RUST_LOG");
  cmd
}

/// Create a temp directory holding an environment file with `content`.
fn temp_env_file(content: &str) -> (TempDir, PathBuf) {
  let temp = TempDir::new().unwrap();
  let path = temp.path().join("environment");
  fs::write(&path, content).unwrap();
  (temp, path)
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  envedit_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  envedit_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("envedit"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["apply", "plan"] {
    envedit_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("--var"));
  }
}

// =============================================================================
// apply
// =============================================================================

#[test]
fn apply_adds_exported_variable() {
  let (_temp, path) = temp_env_file("");

  envedit_cmd()
    .args(["apply", path.to_str().unwrap(), "--var", "FOO", "--value", "bar"])
    .assert()
    .success()
    .stdout(predicate::str::contains("var added"));

  assert_eq!(fs::read_to_string(&path).unwrap(), "export FOO=bar\n");
}

#[test]
fn apply_twice_reports_unchanged() {
  let (_temp, path) = temp_env_file("# keep me\n");
  let args = ["apply", path.to_str().unwrap(), "--var", "FOO", "--value", "a b", "--state", "local"];

  envedit_cmd().args(args).assert().success();
  envedit_cmd()
    .args(args)
    .assert()
    .success()
    .stdout(predicate::str::contains("unchanged"));

  assert_eq!(fs::read_to_string(&path).unwrap(), "# keep me\nFOO=\"a b\"\n");
}

#[test]
fn apply_json_output() {
  let (_temp, path) = temp_env_file("export FOO=bar\n");

  let output = envedit_cmd()
    .args([
      "apply",
      path.to_str().unwrap(),
      "--var",
      "FOO",
      "--state",
      "absent",
      "--format",
      "json",
    ])
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["changed"], true);
  assert_eq!(json["msg"], "var removed");
  assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn apply_with_backup_reports_backup_path() {
  let (temp, path) = temp_env_file("FOO=bar\n");

  envedit_cmd()
    .args(["apply", path.to_str().unwrap(), "--var", "FOO", "--value", "baz", "--backup"])
    .assert()
    .success()
    .stdout(predicate::str::contains("backup"));

  assert_eq!(fs::read_to_string(&path).unwrap(), "FOO=baz\n");
  let backups: Vec<_> = fs::read_dir(temp.path())
    .unwrap()
    .map(|e| e.unwrap().path())
    .filter(|p| p != &path)
    .collect();
  assert_eq!(backups.len(), 1);
  assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "FOO=bar\n");
}

#[test]
fn apply_check_mode_writes_nothing() {
  let (_temp, path) = temp_env_file("FOO=bar\n");

  envedit_cmd()
    .args([
      "apply",
      path.to_str().unwrap(),
      "--var",
      "FOO",
      "--value",
      "baz",
      "--check",
      "--diff",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("check mode"))
    .stdout(predicate::str::contains("- FOO=bar"))
    .stdout(predicate::str::contains("+ FOO=baz"));

  assert_eq!(fs::read_to_string(&path).unwrap(), "FOO=bar\n");
}

#[test]
fn apply_from_params_file() {
  let (temp, path) = temp_env_file("FOO=bar\n");
  let params = temp.path().join("params.json");
  fs::write(
    &params,
    format!(
      r#"{{"path": {}, "var": "FOO", "state": "exported"}}"#,
      serde_json::to_string(&path).unwrap()
    ),
  )
  .unwrap();

  envedit_cmd()
    .args(["apply", "--params", params.to_str().unwrap()])
    .assert()
    .success();

  assert_eq!(fs::read_to_string(&path).unwrap(), "export FOO=bar\n");
}

// =============================================================================
// plan
// =============================================================================

#[test]
fn plan_shows_diff_without_writing() {
  let (_temp, path) = temp_env_file("export FOO=bar\n#comment\n");

  envedit_cmd()
    .args(["plan", path.to_str().unwrap(), "--var", "FOO", "--value", "baz"])
    .assert()
    .success()
    .stdout(predicate::str::contains("+ export FOO=baz"));

  assert_eq!(fs::read_to_string(&path).unwrap(), "export FOO=bar\n#comment\n");
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn missing_file_without_create_exits_not_found() {
  let temp = TempDir::new().unwrap();
  let path = temp.path().join("environment");

  envedit_cmd()
    .args(["apply", path.to_str().unwrap(), "--var", "FOO", "--value", "bar", "--no-create"])
    .assert()
    .code(3)
    .stderr(predicate::str::contains("does not exist"));

  assert!(!path.exists());
}

#[test]
fn invalid_name_exits_invalid_input() {
  let (_temp, path) = temp_env_file("");

  envedit_cmd()
    .args(["apply", path.to_str().unwrap(), "--var", "1BAD", "--value", "x"])
    .assert()
    .code(5)
    .stderr(predicate::str::contains("invalid variable name"));
}

#[test]
fn unknown_state_exits_invalid_input() {
  let (_temp, path) = temp_env_file("");

  envedit_cmd()
    .args(["apply", path.to_str().unwrap(), "--var", "FOO", "--state", "gone"])
    .assert()
    .code(5)
    .stderr(predicate::str::contains("invalid state"));
}

#[test]
fn missing_value_for_new_variable_exits_invalid_input() {
  let (_temp, path) = temp_env_file("BAR=1\n");

  envedit_cmd()
    .args(["apply", path.to_str().unwrap(), "--var", "FOO"])
    .assert()
    .code(5)
    .stderr(predicate::str::contains("no value given"));

  assert_eq!(fs::read_to_string(&path).unwrap(), "BAR=1\n");
}

#[test]
fn missing_var_exits_invalid_input() {
  let (_temp, path) = temp_env_file("");

  envedit_cmd()
    .args(["apply", path.to_str().unwrap()])
    .assert()
    .code(5)
    .stderr(predicate::str::contains("missing required parameter: var"));
}

#[test]
fn directory_target_exits_invalid_input() {
  let temp = TempDir::new().unwrap();

  envedit_cmd()
    .args(["apply", temp.path().to_str().unwrap(), "--var", "FOO", "--value", "bar"])
    .assert()
    .code(5)
    .stderr(predicate::str::contains("is a directory"));
}

#[test]
fn multiline_value_exits_invalid_input() {
  let (_temp, path) = temp_env_file("FOO=x\n");

  envedit_cmd()
    .args(["apply", path.to_str().unwrap(), "--var", "FOO", "--value", "a\nb"])
    .assert()
    .code(5)
    .stderr(predicate::str::contains("single line"));

  assert_eq!(fs::read_to_string(&path).unwrap(), "FOO=x\n");
}
