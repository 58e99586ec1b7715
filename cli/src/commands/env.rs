//! `avtofix-deploy env`: edit or validate a bot's `.env` file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::services::env_config::upsert_env;
use crate::domain::bot_env;

/// Env subcommands.
#[derive(Subcommand)]
pub enum EnvCommand {
    /// Set KEY=VALUE, replacing the existing line or appending a new one
    Set {
        /// Path to the env file (created when missing)
        file: PathBuf,
        /// Variable name
        key: String,
        /// Variable value
        value: String,
    },
    /// Validate a bot env file
    Check {
        /// Path to the env file
        #[arg(default_value = ".env")]
        file: PathBuf,
    },
}

/// Run the env command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written, or the key or
/// value is invalid.
pub fn run(app: &AppContext, cmd: EnvCommand) -> Result<ExitCode> {
    match cmd {
        EnvCommand::Set { file, key, value } => set(app, &file, &key, &value),
        EnvCommand::Check { file } => check(app, &file),
    }
}

fn set(app: &AppContext, file: &Path, key: &str, value: &str) -> Result<ExitCode> {
    upsert_env(&app.fs, file, &[(key, value)])?;
    app.renderer().render_env_set(file, key)?;
    Ok(ExitCode::SUCCESS)
}

fn check(app: &AppContext, file: &Path) -> Result<ExitCode> {
    let vars = load_vars(file)?;
    let issues = bot_env::check(|key| {
        vars.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    });
    app.renderer().render_env_check(file, &issues)?;
    if bot_env::has_errors(&issues) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse the file with dotenv quoting rules; later duplicates win, as they
/// do when the bot loads it.
fn load_vars(file: &Path) -> Result<Vec<(String, String)>> {
    let iter = dotenvy::from_path_iter(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    let mut vars: Vec<(String, String)> = Vec::new();
    for item in iter {
        let (key, value) = item.with_context(|| format!("cannot parse {}", file.display()))?;
        match vars.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => vars.push((key, value)),
        }
    }
    Ok(vars)
}
