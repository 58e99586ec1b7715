//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Deploy errors ─────────────────────────────────────────────────────────────

/// Errors raised while provisioning an instance.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("required command not found: {0}. Install it and re-run.")]
    MissingTool(String),

    /// An external command ran and exited non-zero.
    ///
    /// `code` is `None` when the process was killed by a signal.
    #[error("`{command}` failed{}:\n{stderr}", exit_suffix(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Invalid bot name '{0}': must match ^[A-Za-z0-9][A-Za-z0-9_.-]{{0,63}}$")]
    InvalidBotName(String),

    #[error("Bot name '{0}' is listed more than once.")]
    DuplicateBotName(String),

    #[error("No bot names given. Enter at least one name.")]
    EmptyFleet,

    #[error("A repository URL is required. Set it with: avtofix-deploy config set repo.url <url>")]
    MissingRepoUrl,
}

#[allow(clippy::ref_option)]
fn exit_suffix(code: &Option<i32>) -> String {
    code.map_or_else(|| " (killed by signal)".to_string(), |c| format!(" (exit code {c})"))
}

impl DeployError {
    /// Process exit code that should be propagated for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code: Some(c), .. } if *c != 0 => *c,
            _ => 1,
        }
    }
}

// ── Env file errors ───────────────────────────────────────────────────────────

/// Errors related to `.env` keys and values.
#[derive(Debug, Error)]
pub enum EnvFileError {
    #[error("Invalid variable name '{0}': must match ^[A-Za-z_][A-Za-z0-9_]*$")]
    InvalidKey(String),

    #[error("Value for {0} must be a single line.")]
    MultilineValue(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
