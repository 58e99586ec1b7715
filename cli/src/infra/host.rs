//! Infrastructure implementation of the host toolchain port traits.
//!
//! `HostProvisioner<R>` routes every git, python and systemctl call through
//! a `CommandRunner` so tests can inject a recording runner without
//! spawning real processes.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, PythonRuntime, ServiceManager, SourceControl, ToolProbe,
};
use crate::infra::command_runner::{PROBE_TIMEOUT, TokioCommandRunner, ensure_success};

/// Adapter that drives the host's git, Python and systemd tooling.
pub struct HostProvisioner<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> HostProvisioner<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Run a command and fail with the tool's own exit code on non-zero exit.
    async fn checked(&self, program: &str, args: &[&str]) -> Result<()> {
        let output = self
            .runner
            .run(program, args)
            .await
            .with_context(|| format!("{program} {}", args.first().copied().unwrap_or_default()))?;
        ensure_success(program, args, output)?;
        Ok(())
    }

    async fn git(&self, dir: &Path, args: &[&str]) -> Result<()> {
        let dir = path_arg(dir);
        let mut full = vec!["-C", dir.as_str()];
        full.extend_from_slice(args);
        self.checked("git", &full).await
    }
}

impl HostProvisioner<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::unbounded())
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Whether git's `--show-toplevel` answer is `dir` itself. A directory that
/// merely sits inside some other repository does not count.
fn is_repo_root(toplevel: &str, dir: &Path) -> bool {
    if toplevel.is_empty() {
        return false;
    }
    let canonical = |p: &Path| std::fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
    canonical(Path::new(toplevel)) == canonical(dir)
}

impl<R: CommandRunner> ToolProbe for HostProvisioner<R> {
    async fn probe(&self, program: &str) -> Option<String> {
        let output = self
            .runner
            .run_with_timeout(program, &["--version"], PROBE_TIMEOUT)
            .await
            .ok()?;
        if !output.status.success() {
            tracing::debug!(program, code = ?output.status.code(), "version probe failed");
            return None;
        }
        // Older Pythons print the version on stderr.
        let text = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Some(
            String::from_utf8_lossy(&text)
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string(),
        )
    }
}

impl<R: CommandRunner> SourceControl for HostProvisioner<R> {
    async fn is_work_tree(&self, dir: &Path) -> Result<bool> {
        let dir = path_arg(dir);
        let output = self
            .runner
            .run_with_timeout(
                "git",
                &["-C", &dir, "rev-parse", "--show-toplevel"],
                PROBE_TIMEOUT,
            )
            .await
            .context("git rev-parse")?;
        if !output.status.success() {
            return Ok(false);
        }
        let toplevel = String::from_utf8_lossy(&output.stdout);
        Ok(is_repo_root(toplevel.trim(), Path::new(&dir)))
    }

    async fn fetch_all(&self, dir: &Path) -> Result<()> {
        self.git(dir, &["fetch", "--all", "--prune"]).await
    }

    async fn checkout(&self, dir: &Path, branch: &str) -> Result<()> {
        self.git(dir, &["checkout", branch]).await
    }

    async fn pull_ff_only(&self, dir: &Path, branch: &str) -> Result<()> {
        self.git(dir, &["pull", "--ff-only", "origin", branch]).await
    }

    async fn clone_shallow(&self, url: &str, branch: &str, dir: &Path) -> Result<()> {
        let dir = path_arg(dir);
        self.checked(
            "git",
            &[
                "clone",
                "--depth",
                "1",
                "--branch",
                branch,
                "--single-branch",
                url,
                &dir,
            ],
        )
        .await
    }
}

impl<R: CommandRunner> PythonRuntime for HostProvisioner<R> {
    async fn create_venv(&self, python: &str, venv_dir: &Path) -> Result<()> {
        let venv = path_arg(venv_dir);
        self.checked(python, &["-m", "venv", &venv]).await
    }

    async fn upgrade_pip(&self, venv_python: &Path) -> Result<()> {
        let py = path_arg(venv_python);
        self.checked(&py, &["-m", "pip", "install", "--upgrade", "pip"])
            .await
    }

    async fn install_requirements(&self, venv_python: &Path, requirements: &Path) -> Result<()> {
        let py = path_arg(venv_python);
        let req = path_arg(requirements);
        self.checked(&py, &["-m", "pip", "install", "-r", &req]).await
    }
}

impl<R: CommandRunner> ServiceManager for HostProvisioner<R> {
    async fn daemon_reload(&self) -> Result<()> {
        self.checked("systemctl", &["daemon-reload"]).await
    }

    async fn enable(&self, service: &str) -> Result<()> {
        self.checked("systemctl", &["enable", service]).await
    }

    async fn restart(&self, service: &str) -> Result<()> {
        self.checked("systemctl", &["restart", service]).await
    }

    async fn is_active(&self, service: &str) -> Result<String> {
        // Non-zero exit is the normal answer for inactive or failed units.
        let output = self
            .runner
            .run_with_timeout("systemctl", &["is-active", service], PROBE_TIMEOUT)
            .await
            .context("systemctl is-active")?;
        let state = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if state.is_empty() {
            "unknown".to_string()
        } else {
            state
        })
    }
}
