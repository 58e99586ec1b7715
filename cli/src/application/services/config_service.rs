//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::DeployConfig;

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<DeployConfig> {
    store.load()
}

/// Validate `key = value`, apply it to the stored configuration and save.
/// Returns the updated configuration.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the file cannot be
/// read or written. Nothing is saved on a validation failure.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<DeployConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    tracing::info!(key, "config updated");
    Ok(config)
}
