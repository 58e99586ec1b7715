//! Unit tests for `HostProvisioner` argument construction and exit-code
//! handling.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;
use std::process::Output;

use avtofix_deploy::application::ports::{PythonRuntime, ServiceManager, SourceControl, ToolProbe};
use avtofix_deploy::domain::DeployError;
use avtofix_deploy::infra::host::HostProvisioner;

use crate::mocks::{MockCommandRunner, err_output, exit_status, ok_output};

fn args(runner: &MockCommandRunner, index: usize) -> (String, Vec<String>) {
    runner.calls()[index].clone()
}

#[tokio::test]
async fn test_clone_shallow_args() {
    let runner = MockCommandRunner::new();
    let host = HostProvisioner::new(runner.clone());

    host.clone_shallow("https://example.com/bot.git", "release", Path::new("/opt/bot"))
        .await
        .expect("clone");

    let (program, argv) = args(&runner, 0);
    assert_eq!(program, "git");
    assert_eq!(
        argv,
        [
            "clone",
            "--depth",
            "1",
            "--branch",
            "release",
            "--single-branch",
            "https://example.com/bot.git",
            "/opt/bot"
        ]
    );
}

#[tokio::test]
async fn test_pull_ff_only_runs_in_app_dir() {
    let runner = MockCommandRunner::new();
    let host = HostProvisioner::new(runner.clone());

    host.pull_ff_only(Path::new("/opt/bot"), "main").await.expect("pull");

    let (_, argv) = args(&runner, 0);
    assert_eq!(argv, ["-C", "/opt/bot", "pull", "--ff-only", "origin", "main"]);
}

#[tokio::test]
async fn test_is_work_tree_false_outside_repo() {
    let runner = MockCommandRunner::new().respond(
        "git -C /opt/bot rev-parse",
        err_output(128, b"fatal: not a git repository"),
    );
    let host = HostProvisioner::new(runner);

    assert!(!host.is_work_tree(Path::new("/opt/bot")).await.expect("probe"));
}

#[tokio::test]
async fn test_failed_command_keeps_exit_code_and_stderr() {
    let runner = MockCommandRunner::new().respond(
        "python3 -m venv",
        err_output(1, b"ensurepip is not available"),
    );
    let host = HostProvisioner::new(runner);

    let err = host
        .create_venv("python3", Path::new("/opt/bot/.venv"))
        .await
        .expect_err("venv failure");

    match err.downcast_ref::<DeployError>() {
        Some(DeployError::CommandFailed {
            command,
            code,
            stderr,
        }) => {
            assert_eq!(command, "python3 -m venv /opt/bot/.venv");
            assert_eq!(*code, Some(1));
            assert!(stderr.contains("ensurepip"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_install_requirements_uses_venv_interpreter() {
    let runner = MockCommandRunner::new();
    let host = HostProvisioner::new(runner.clone());

    host.install_requirements(
        Path::new("/opt/bot/.venv/bin/python"),
        Path::new("/opt/bot/requirements.txt"),
    )
    .await
    .expect("install");

    let (program, argv) = args(&runner, 0);
    assert_eq!(program, "/opt/bot/.venv/bin/python");
    assert_eq!(argv, ["-m", "pip", "install", "-r", "/opt/bot/requirements.txt"]);
}

#[tokio::test]
async fn test_is_active_non_zero_exit_is_an_answer() {
    let runner = MockCommandRunner::new().respond(
        "systemctl is-active",
        Output {
            status: exit_status(3),
            stdout: b"inactive\n".to_vec(),
            stderr: Vec::new(),
        },
    );
    let host = HostProvisioner::new(runner);

    assert_eq!(host.is_active("avto-fix-bot").await.expect("query"), "inactive");
}

#[tokio::test]
async fn test_probe_reads_first_line_from_stderr_when_stdout_empty() {
    let runner = MockCommandRunner::new().respond(
        "python2 --version",
        Output {
            status: exit_status(0),
            stdout: Vec::new(),
            stderr: b"Python 2.7.18\n".to_vec(),
        },
    );
    let host = HostProvisioner::new(runner);

    assert_eq!(host.probe("python2").await.as_deref(), Some("Python 2.7.18"));
}

#[tokio::test]
async fn test_probe_missing_tool_is_none() {
    let runner = MockCommandRunner::new().respond("git --version", err_output(127, b""));
    let host = HostProvisioner::new(runner);

    assert!(host.probe("git").await.is_none());
}

#[tokio::test]
async fn test_restart_failure_is_command_failed() {
    let runner = MockCommandRunner::new()
        .respond("systemctl restart", err_output(1, b"Job for x.service failed"))
        .respond("systemctl enable", ok_output(b""));
    let host = HostProvisioner::new(runner);

    host.enable("x").await.expect("enable");
    let err = host.restart("x").await.expect_err("restart");
    assert!(err.to_string().contains("systemctl restart x"));
}

#[tokio::test]
async fn test_is_work_tree_true_only_at_repository_root() {
    let runner = MockCommandRunner::new()
        .respond("git -C /srv/bots/alpha rev-parse", ok_output(b"/srv/bots/alpha\n"))
        .respond("git -C /srv/bots/beta rev-parse", ok_output(b"/srv\n"));
    let host = HostProvisioner::new(runner.clone());

    assert!(host.is_work_tree(Path::new("/srv/bots/alpha")).await.expect("probe"));
    assert!(!host.is_work_tree(Path::new("/srv/bots/beta")).await.expect("probe"));
    assert!(runner.ran("rev-parse --show-toplevel"));
}

#[tokio::test]
async fn test_is_work_tree_false_for_plain_dir_inside_real_repo() {
    if std::process::Command::new("git").arg("--version").output().is_err() {
        return;
    }
    let outer = tempfile::tempdir().expect("temp dir");
    let status = std::process::Command::new("git")
        .args(["init", "-q"])
        .current_dir(outer.path())
        .status()
        .expect("git init");
    assert!(status.success());
    let nested = outer.path().join("bots").join("alpha");
    std::fs::create_dir_all(&nested).expect("mkdir");

    let host = HostProvisioner::default_runner();
    assert!(!host.is_work_tree(&nested).await.expect("probe"));
    assert!(host.is_work_tree(outer.path()).await.expect("probe"));
}
