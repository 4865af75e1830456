//! Tests for the `resolve` command.

use assert_cmd::Command;
use predicates::prelude::*;

use super::install_fixture;

fn megazord() -> Command {
    let mut cmd = Command::cargo_bin("megazord").unwrap();
    cmd.env_remove("MEGAZORD_LIBRARY")
        .env_remove("MEGAZORD_VERSION")
        .env_remove("MEGAZORD_LIBRARY_PATH");
    cmd
}

/// Test resolve requires component and version.
#[test]
fn test_resolve_requires_arguments() {
    megazord()
        .arg("resolve")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("required"));
}

/// Test resolving against a configured library with a matching version.
#[test]
fn test_resolve_configured_match() {
    megazord()
        .args(["resolve", "logins", "1.0", "--library", "lockbox", "--library-version", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::diff("lockbox\n"));
}

/// Test resolving against a configured library with a different version.
#[test]
fn test_resolve_configured_mismatch() {
    megazord()
        .args(["resolve", "logins", "2.0", "--library", "lockbox", "--library-version", "1.0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "component `logins` expects version 2.0 but megazord `lockbox` has version 1.0",
        ));
}

/// Test the library flags must be given together.
#[test]
fn test_resolve_library_flags_paired() {
    megazord()
        .args(["resolve", "logins", "1.0", "--library", "lockbox"])
        .assert()
        .failure()
        .code(2);
}

/// Test the environment configures the dry run when flags are absent.
#[test]
fn test_resolve_from_environment() {
    megazord()
        .env("MEGAZORD_LIBRARY", "lockbox")
        .env("MEGAZORD_VERSION", "1.0")
        .args(["resolve", "logins", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::diff("lockbox\n"));
}

/// Test an incomplete environment is reported.
#[test]
fn test_resolve_incomplete_environment() {
    megazord()
        .env("MEGAZORD_LIBRARY", "lockbox")
        .args(["resolve", "logins", "1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MEGAZORD_VERSION"));
}

/// Test resolving with nothing configured and no full megazord installed.
#[test]
fn test_resolve_not_initialized() {
    let empty = tempfile::tempdir().unwrap();

    megazord()
        .args(["resolve", "logins", "1.0", "--dir"])
        .arg(empty.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

/// Test JSON output carries the registry state.
#[test]
fn test_resolve_json_output() {
    let output = megazord()
        .args([
            "resolve",
            "logins",
            "1.0",
            "--library",
            "lockbox",
            "--library-version",
            "1.0",
            "--json",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["library"], "lockbox");
    assert_eq!(report["registry"]["library_in_use"], "lockbox");
    assert!(report.get("error").is_none());
}

/// Test resolving falls back to an installed full megazord.
#[test]
fn test_resolve_installed_full_megazord() {
    let dir = tempfile::tempdir().unwrap();
    install_fixture(dir.path(), "megazord");

    megazord()
        .args(["resolve", "tabs", "1.0", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("megazord\n"));

    megazord()
        .args(["resolve", "tabs", "2.0", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("has version 1.0"));
}
