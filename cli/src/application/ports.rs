//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::DeployConfig;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations apply their configured default timeout, if any.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Host Tool Ports ───────────────────────────────────────────────────────────

/// Checks whether an external tool can be executed.
#[allow(async_fn_in_trait)]
pub trait ToolProbe {
    /// First line of `<program> --version`, or `None` when the program
    /// cannot be spawned.
    async fn probe(&self, program: &str) -> Option<String>;
}

/// Git working-tree operations.
#[allow(async_fn_in_trait)]
pub trait SourceControl {
    /// Whether `dir` is inside a git working tree.
    async fn is_work_tree(&self, dir: &Path) -> Result<bool>;
    /// Fetch all remotes, pruning deleted refs.
    async fn fetch_all(&self, dir: &Path) -> Result<()>;
    /// Switch the working tree to `branch`.
    async fn checkout(&self, dir: &Path, branch: &str) -> Result<()>;
    /// Fast-forward `branch` from `origin`; fails on divergent history.
    async fn pull_ff_only(&self, dir: &Path, branch: &str) -> Result<()>;
    /// Depth-1 clone of exactly `branch` into `dir`.
    async fn clone_shallow(&self, url: &str, branch: &str, dir: &Path) -> Result<()>;
}

/// Python virtual-environment operations.
#[allow(async_fn_in_trait)]
pub trait PythonRuntime {
    /// `<python> -m venv <venv_dir>`.
    async fn create_venv(&self, python: &str, venv_dir: &Path) -> Result<()>;
    /// Upgrade pip inside the environment whose interpreter is `venv_python`.
    async fn upgrade_pip(&self, venv_python: &Path) -> Result<()>;
    /// Install the pinned requirements file into the environment.
    async fn install_requirements(&self, venv_python: &Path, requirements: &Path) -> Result<()>;
}

/// systemd unit control.
#[allow(async_fn_in_trait)]
pub trait ServiceManager {
    async fn daemon_reload(&self) -> Result<()>;
    async fn enable(&self, service: &str) -> Result<()>;
    /// Start the unit, or restart it when it is already running.
    async fn restart(&self, service: &str) -> Result<()>;
    /// Raw `systemctl is-active` answer (`active`, `inactive`, `failed`, ...).
    async fn is_active(&self, service: &str) -> Result<String>;
}

/// Composite trait: any type implementing all four sub-traits is a `HostToolchain`.
pub trait HostToolchain: ToolProbe + SourceControl + PythonRuntime + ServiceManager {}

/// Blanket implementation: any type implementing all four sub-traits is a `HostToolchain`.
impl<T> HostToolchain for T where T: ToolProbe + SourceControl + PythonRuntime + ServiceManager {}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit a neutral hint (manual follow-up commands and the like).
    fn info(&self, message: &str);
}

// ── Config and Filesystem Ports ───────────────────────────────────────────────

/// Abstracts deployer configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, returning defaults if no file exists.
    fn load(&self) -> Result<DeployConfig>;
    /// Persist the configuration.
    fn save(&self, config: &DeployConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}

/// Abstracts the local filesystem operations used during provisioning.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Read a UTF-8 file, returning `None` when it does not exist.
    fn read_to_string(&self, path: &Path) -> Result<Option<String>>;
    /// Write a world-readable file (unit files).
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Replace a file's content; the file is owner read/write only before
    /// any byte of `content` reaches it.
    fn write_private(&self, path: &Path, content: &str) -> Result<()>;
    /// Tighten an existing file to owner read/write only.
    fn restrict_permissions(&self, path: &Path) -> Result<()>;
}
