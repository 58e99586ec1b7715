//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;
pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::application::services::deploy::InstanceReport;
use crate::application::services::fleet_status::InstanceStatus;
use crate::application::services::preflight::ToolCheck;
use crate::domain::DeployConfig;
use crate::domain::bot_env::EnvIssue;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<12} {value}", key.style(self.styles.dim));
        }
    }
}

/// Output-mode dispatch for command results.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_deploy(&self, report: &InstanceReport) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_deploy(report);
                Ok(())
            }
            Self::Json(r) => r.render_deploy(report),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_fleet(&self, reports: &[InstanceReport]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_fleet(reports);
                Ok(())
            }
            Self::Json(r) => r.render_fleet(reports),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_status(&self, statuses: &[InstanceStatus]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_status(statuses);
                Ok(())
            }
            Self::Json(r) => r.render_status(statuses),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &DeployConfig, path: &Path) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config(config, path);
                Ok(())
            }
            Self::Json(r) => r.render_config(config, path),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_doctor(&self, checks: &[ToolCheck]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_doctor(checks);
                Ok(())
            }
            Self::Json(r) => r.render_doctor(checks),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_env_check(&self, path: &Path, issues: &[EnvIssue]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_env_check(path, issues);
                Ok(())
            }
            Self::Json(r) => r.render_env_check(path, issues),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_env_set(&self, path: &Path, key: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_env_set(path, key);
                Ok(())
            }
            Self::Json(r) => r.render_env_set(path, key),
        }
    }
}
