//! Command implementations

pub mod config;
pub mod deploy;
pub mod doctor;
pub mod env;
pub mod fleet;
pub mod status;

use anyhow::Result;

use crate::app::AppContext;
use crate::domain::{DeployConfig, DeployError, validate_config_value};

/// Resolve the repository URL from the flag, the prompt, or the config.
///
/// # Errors
///
/// Returns [`DeployError::MissingRepoUrl`] when no value is available.
pub(crate) fn resolve_repo_url(
    app: &AppContext,
    config: &DeployConfig,
    flag: Option<String>,
) -> Result<String> {
    let url = match flag {
        Some(url) => url,
        None => app.input(
            "Repository URL",
            config.repo.url.as_deref().unwrap_or_default(),
        )?,
    };
    let url = url.trim().to_string();
    if url.is_empty() {
        return Err(DeployError::MissingRepoUrl.into());
    }
    validate_config_value("repo.url", &url)?;
    Ok(url)
}

/// Resolve a plain setting from the flag or a prompt defaulting to `current`,
/// validated like the matching config key.
///
/// # Errors
///
/// Returns an error if the prompt fails or the value is invalid.
pub(crate) fn resolve_setting(
    app: &AppContext,
    key: &str,
    prompt: &str,
    current: &str,
    flag: Option<String>,
) -> Result<String> {
    let value = match flag {
        Some(v) => v.trim().to_string(),
        None => app.input(prompt, current)?,
    };
    validate_config_value(key, &value)?;
    Ok(value)
}
