//! Config reconciliation for the bot's `.env` file.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::LocalFs;
use crate::domain::env_file::{self, TokenState};

/// Make sure the env file exists and is owner read/write only.
///
/// Runs before any secret is written so there is no window where the file
/// is world-readable.
///
/// # Errors
///
/// Returns an error if the file cannot be created or its mode changed.
pub fn ensure_env_file(fs: &impl LocalFs, path: &Path) -> Result<()> {
    if fs.exists(path) {
        fs.restrict_permissions(path)
    } else {
        if let Some(parent) = path.parent() {
            fs.create_dir_all(parent)?;
        }
        tracing::debug!(path = %path.display(), "creating env file");
        fs.write_private(path, "")
    }
}

/// Set every `(key, value)` pair, replacing existing lines in place.
///
/// The file is written once, after all pairs are applied, and only when
/// the content changed.
///
/// # Errors
///
/// Returns an error if a key or value is invalid or the file cannot be
/// read or written.
pub fn upsert_env(fs: &impl LocalFs, path: &Path, pairs: &[(&str, &str)]) -> Result<()> {
    apply(fs, path, pairs, env_file::upsert)
}

/// Add every `(key, value)` pair whose key is not present yet; existing
/// values, including blank ones, are left alone.
///
/// # Errors
///
/// Returns an error if a key or value is invalid or the file cannot be
/// read or written.
pub fn ensure_env_keys(fs: &impl LocalFs, path: &Path, pairs: &[(&str, &str)]) -> Result<()> {
    apply(fs, path, pairs, env_file::ensure)
}

fn apply(
    fs: &impl LocalFs,
    path: &Path,
    pairs: &[(&str, &str)],
    op: fn(&str, &str, &str) -> Result<String, crate::domain::EnvFileError>,
) -> Result<()> {
    ensure_env_file(fs, path)?;
    let original = fs.read_to_string(path)?.unwrap_or_default();
    let mut content = original.clone();
    for (key, value) in pairs {
        content = op(&content, key, value)
            .with_context(|| format!("updating {}", path.display()))?;
    }
    if content != original {
        fs.write_private(path, &content)?;
        tracing::info!(
            path = %path.display(),
            keys = ?pairs.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            "env file updated"
        );
    }
    Ok(())
}

/// Current raw value of `key`, or `None` when the file or key is missing.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_value(fs: &impl LocalFs, path: &Path, key: &str) -> Result<Option<String>> {
    Ok(fs
        .read_to_string(path)?
        .and_then(|c| env_file::get(&c, key).map(str::to_string)))
}

/// Token state of the env file at `path`; a missing file is `Unset`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_token_state(fs: &impl LocalFs, path: &Path) -> Result<TokenState> {
    Ok(TokenState::classify(
        read_value(fs, path, env_file::BOT_TOKEN)?.as_deref(),
    ))
}
