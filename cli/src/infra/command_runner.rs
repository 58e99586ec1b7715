//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution, with an optional timeout that kills the
//! child when it fires.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::CommandRunner;
use crate::domain::DeployError;

/// Timeout for quick status probes (`systemctl is-active`, `--version`).
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Production `CommandRunner`.
///
/// Long-running provisioning steps (clone, pip install, service start) run
/// without a timeout of our own; only the tools' own limits apply.
pub struct TokioCommandRunner {
    timeout: Option<Duration>,
}

impl TokioCommandRunner {
    /// Runner that waits for every command to exit.
    #[must_use]
    pub fn unbounded() -> Self {
        Self { timeout: None }
    }

    /// Runner that kills commands running longer than `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    async fn execute(
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<Output> {
        tracing::debug!(command = %command_line(program, args), "spawning");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        let collect = async {
            let (status, stdout, stderr) = tokio::join!(
                child.wait(),
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut h) = stdout_handle {
                        let _ = h.read_to_end(&mut buf).await;
                    }
                    buf
                },
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut h) = stderr_handle {
                        let _ = h.read_to_end(&mut buf).await;
                    }
                    buf
                },
            );
            Ok::<Output, anyhow::Error>(Output {
                status: status.with_context(|| format!("waiting for {program}"))?,
                stdout,
                stderr,
            })
        };

        let output = match timeout {
            None => collect.await?,
            Some(limit) => match tokio::time::timeout(limit, collect).await {
                Ok(result) => result?,
                Err(_) => {
                    // kill_on_drop reaps the child once `child` goes out of scope.
                    anyhow::bail!("{program} timed out after {}s", limit.as_secs())
                }
            },
        };

        tracing::debug!(
            command = %command_line(program, args),
            code = ?output.status.code(),
            "exited"
        );
        Ok(output)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        Self::execute(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        Self::execute(program, args, Some(timeout)).await
    }
}

/// Render a command for logs and error messages.
#[must_use]
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn a non-zero exit into [`DeployError::CommandFailed`] carrying the
/// tool's stderr (or stdout when stderr is empty) and exit code.
///
/// # Errors
///
/// Returns an error if `output.status` is not success.
pub fn ensure_success(program: &str, args: &[&str], output: Output) -> Result<Output> {
    if output.status.success() {
        return Ok(output);
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let detail = if stderr.is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr
    };
    Err(DeployError::CommandFailed {
        command: command_line(program, args),
        code: output.status.code(),
        stderr: detail,
    }
    .into())
}
