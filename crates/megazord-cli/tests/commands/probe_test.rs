//! Tests for the `probe` and `version` commands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

use super::install_fixture;

fn megazord() -> Command {
    let mut cmd = Command::cargo_bin("megazord").unwrap();
    cmd.env_remove("MEGAZORD_LIBRARY_PATH");
    cmd
}

/// Test probing when no full megazord is installed.
#[test]
fn test_probe_not_present() {
    let empty = tempfile::tempdir().unwrap();

    megazord()
        .arg("probe")
        .arg("--dir")
        .arg(empty.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("megazord: not present"));
}

/// Test probing with an expected version reports absence.
#[test]
fn test_probe_expect_not_present() {
    megazord()
        .args(["probe", "--expect", "1.0", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("not_present"));
}

/// Test version requires a library name.
#[test]
fn test_version_requires_library() {
    megazord()
        .arg("version")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("<LIBRARY>"));
}

/// Test a file that is not a loadable library is reported as absent.
#[test]
fn test_version_corrupt_library() {
    let dir = tempfile::tempdir().unwrap();
    let file_name = if cfg!(target_os = "windows") {
        "broken.dll"
    } else if cfg!(target_os = "macos") {
        "libbroken.dylib"
    } else {
        "libbroken.so"
    };
    fs::write(dir.path().join(file_name), b"not a library").unwrap();

    let output = megazord()
        .args(["version", "broken", "--json", "--dir"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["library"], "broken");
    assert_eq!(report["present"], false);
    assert!(report["error"].as_str().unwrap().contains("broken"));
}

/// Test the version of an installed aggregate is read with its path.
#[test]
fn test_version_installed_library() {
    let dir = tempfile::tempdir().unwrap();
    let installed = install_fixture(dir.path(), "megazord");

    let output = megazord()
        .args(["version", "megazord", "--json", "--dir"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["present"], true);
    assert_eq!(report["version"], "1.0");
    assert_eq!(report["path"], installed.display().to_string());
}

/// Test probing an installed full megazord against its own and another version.
#[test]
fn test_probe_installed_library() {
    let dir = tempfile::tempdir().unwrap();
    install_fixture(dir.path(), "megazord");

    megazord()
        .args(["probe", "--expect", "1.0", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("megazord: compatible (1.0)"));

    megazord()
        .args(["probe", "--expect", "2.0", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "incompatible (expected 2.0, found 1.0)",
        ));
}
