//! Integration tests for `avtofix-deploy config`.
//!
//! Every test points `AVTOFIX_CONFIG` at a temp path so it never reads or
//! writes `~/.avtofix/deploy.yaml`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn avtofix() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("avtofix-deploy"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("deploy.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

#[test]
fn test_config_help_shows_show_and_set_subcommands() {
    avtofix()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"));
}

#[test]
fn test_config_show_no_config_file_uses_defaults() {
    let (_dir, path) = temp_config_path();
    avtofix()
        .args(["config", "show"])
        .env("AVTOFIX_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("/opt/avto-fix-bots"))
        .stdout(predicate::str::contains("avto-fix-bot-"))
        .stdout(predicate::str::contains("python3"));
}

#[test]
fn test_config_show_does_not_create_file() {
    let (_dir, path) = temp_config_path();
    avtofix()
        .args(["config", "show"])
        .env("AVTOFIX_CONFIG", &path)
        .assert()
        .success();
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_persists_value_with_private_mode() {
    let (_dir, path) = temp_config_path();
    avtofix()
        .args(["config", "set", "repo.url", "https://example.com/bot.git"])
        .env("AVTOFIX_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Set repo.url"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("https://example.com/bot.git"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    avtofix()
        .args(["config", "show"])
        .env("AVTOFIX_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("https://example.com/bot.git"));
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (_dir, path) = temp_config_path();
    avtofix()
        .args(["config", "set", "nope.key", "x"])
        .env("AVTOFIX_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown setting"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_bot_name_fails() {
    let (_dir, path) = temp_config_path();
    avtofix()
        .args(["config", "set", "fleet.bots", "alpha,-bad"])
        .env("AVTOFIX_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("-bad"));
}

#[test]
fn test_config_show_json_is_valid() {
    let (_dir, path) = temp_config_path();
    let output = avtofix()
        .args(["--json", "config", "show"])
        .env("AVTOFIX_CONFIG", &path)
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["config"]["repo"]["branch"], "main");
    assert_eq!(value["config"]["fleet"]["service_prefix"], "avto-fix-bot-");
}

#[test]
fn test_status_with_no_bots_reports_empty() {
    let (_dir, path) = temp_config_path();
    let output = avtofix()
        .args(["--json", "status"])
        .env("AVTOFIX_CONFIG", &path)
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["instances"], serde_json::json!([]));
}

#[test]
fn test_json_error_object_on_failure() {
    let (_dir, path) = temp_config_path();
    let output = avtofix()
        .args(["--json", "config", "set", "nope.key", "x"])
        .env("AVTOFIX_CONFIG", &path)
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], 1);
}
