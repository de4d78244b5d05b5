//! Integration tests for the appstate binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn appstate(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("appstate"));
    cmd.current_dir(dir);
    cmd.env_remove("APPSTATE_DB");
    cmd.env_remove("RUST_LOG");
    cmd.args(["--db", "db.json"]);
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("appstate"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Versioned app state"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("appstate"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn create_release_and_load_snapshot() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;

    let user = json_output(appstate(temp.path()).args(["user", "add", "ada"]));
    assert_eq!(user["userId"], 1);

    let app = json_output(appstate(temp.path()).args(["app", "create", "shop", "--user", "1"]));
    assert_eq!(app["appName"], "shop");
    assert_eq!(app["appActivity"]["modifier"], "ada");
    let id = app["appId"].to_string();

    let released = json_output(appstate(temp.path()).args(["release", &id]));
    assert_eq!(released["mainline_version"], 1);
    assert_eq!(released["release_version"], 1);

    let document = json_output(appstate(temp.path()).args(["editor", &id, "1"]));
    assert_eq!(document["components"]["displayName"], "root");
    assert_eq!(document["appInfo"]["mainline_version"], 1);

    assert!(temp.path().join("db.json").exists());
    Ok(())
}

#[test]
fn version_beyond_mainline_exits_with_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    appstate(temp.path())
        .args(["app", "create", "shop"])
        .assert()
        .success();

    appstate(temp.path())
        .args(["editor", "1", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Version 3 of app 1 not found"));
    Ok(())
}

#[test]
fn unknown_app_exits_with_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    appstate(temp.path())
        .args(["release", "42"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("App not found: 42"));
    Ok(())
}

#[test]
fn duplicate_creates_new_app() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    appstate(temp.path())
        .args(["app", "create", "shop"])
        .assert()
        .success();

    let copy = json_output(appstate(temp.path()).args(["duplicate", "1", "--name", "Copy"]));
    assert_eq!(copy["appId"], 2);
    assert_eq!(copy["appName"], "Copy");

    let listed = json_output(appstate(temp.path()).args(["app", "list"]));
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn config_file_sets_store_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(
        temp.path().join("appstate.yml"),
        "store:\n  path: data/state.json\n",
    )?;

    let mut cmd = Command::new(cargo_bin("appstate"));
    cmd.current_dir(temp.path())
        .env_remove("APPSTATE_DB")
        .args(["app", "create", "shop"]);
    cmd.assert().success();

    assert!(temp.path().join("data/state.json").exists());
    Ok(())
}

#[test]
fn corrupt_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("appstate.yml"), "clone: [oops")?;

    appstate(temp.path())
        .args(["app", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config"));
    Ok(())
}

#[test]
fn generates_completions() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    appstate(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("appstate"));
    assert!(!temp.path().join("db.json").exists());
    Ok(())
}
