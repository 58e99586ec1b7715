//! Integration tests for the avtofix-deploy command surface.
//!
//! These tests spawn the real binary. Nothing here touches git, pip or
//! systemd: only argument parsing and the file-local `env` subcommands.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn avtofix() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("avtofix-deploy"));
    cmd.env("NO_COLOR", "1");
    cmd
}

const REAL_TOKEN: &str = "123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw";

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    avtofix().assert().code(2).stderr(predicate::str::contains(
        "Provision and run Avto Fix Bot instances",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    avtofix()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("fleet"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    avtofix()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("avtofix-deploy"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    avtofix().arg("frobnicate").assert().code(2);
}

// --- env set ---

#[test]
fn test_env_set_creates_private_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("bot").join(".env");

    avtofix()
        .args(["env", "set"])
        .arg(&path)
        .args(["TARGET_CHAT", "-100123"])
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "TARGET_CHAT=-100123\n");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_env_set_replaces_in_place_and_is_idempotent() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(".env");
    std::fs::write(&path, "A=1\nBOT_TOKEN=old\nB=2\n").unwrap();

    for _ in 0..2 {
        avtofix()
            .args(["env", "set"])
            .arg(&path)
            .args(["BOT_TOKEN", "new"])
            .assert()
            .success();
    }

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "A=1\nBOT_TOKEN=new\nB=2\n"
    );
}

#[test]
fn test_env_set_rejects_invalid_key() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(".env");

    avtofix()
        .args(["env", "set"])
        .arg(&path)
        .args(["BAD-KEY", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("BAD-KEY"));
}

#[test]
fn test_env_set_json_output() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(".env");

    let output = avtofix()
        .args(["--json", "env", "set"])
        .arg(&path)
        .args(["ADMIN_IDS", "1,2"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["key"], "ADMIN_IDS");
    assert_eq!(value["updated"], true);
}

// --- env check ---

#[test]
fn test_env_check_valid_file_succeeds() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(".env");
    std::fs::write(
        &path,
        format!("BOT_TOKEN={REAL_TOKEN}\nTARGET_CHAT=-100123\nADMIN_IDS=1,2\n"),
    )
    .unwrap();

    avtofix()
        .args(["env", "check"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("looks good"));
}

#[test]
fn test_env_check_blank_token_fails() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(".env");
    std::fs::write(&path, "BOT_TOKEN=\nTARGET_CHAT=-100123\n").unwrap();

    avtofix()
        .args(["env", "check"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("BOT_TOKEN"));
}

#[test]
fn test_env_check_quoted_values_follow_dotenv_rules() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(".env");
    std::fs::write(
        &path,
        format!("BOT_TOKEN=\"{REAL_TOKEN}\"\nTARGET_CHAT='-100123'\nADMIN_IDS=1\n"),
    )
    .unwrap();

    avtofix().args(["env", "check"]).arg(&path).assert().success();
}

#[test]
fn test_env_check_missing_file_fails() {
    let dir = TempDir::new().expect("temp dir");

    avtofix()
        .args(["env", "check"])
        .arg(dir.path().join("nope.env"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

// --- fleet argument validation (fails before any host tool runs) ---

#[test]
fn test_fleet_rejects_duplicate_names() {
    let dir = TempDir::new().expect("temp dir");
    avtofix()
        .env("AVTOFIX_CONFIG", dir.path().join("deploy.yaml"))
        .args([
            "--yes",
            "fleet",
            "--repo",
            "https://example.com/bot.git",
            "--bots",
            "alpha,beta alpha",
        ])
        .arg("--base-dir")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("more than once"));
}

#[test]
fn test_fleet_without_repo_url_fails_non_interactively() {
    let dir = TempDir::new().expect("temp dir");
    avtofix()
        .env("AVTOFIX_CONFIG", dir.path().join("deploy.yaml"))
        .args(["--yes", "fleet", "--bots", "alpha"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("repository URL is required"));
}
