//! Domain types and validators for deployer configuration.
//!
//! The config file only supplies defaults for the interactive prompts; every
//! value can still be changed at prompt time.
//!
//! Pure functions only. No I/O or async.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::instance::{parse_bot_names, validate_bot_name};

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "repo.url",
    "repo.branch",
    "single.app_dir",
    "single.service",
    "fleet.base_dir",
    "fleet.service_prefix",
    "fleet.bots",
    "systemd.unit_dir",
    "systemd.user",
    "python",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.avtofix/deploy.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeployConfig {
    pub repo: RepoConfig,
    pub single: SingleConfig,
    pub fleet: FleetConfig,
    pub systemd: SystemdConfig,
    /// Interpreter used to create virtual environments.
    pub python: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            repo: RepoConfig::default(),
            single: SingleConfig::default(),
            fleet: FleetConfig::default(),
            systemd: SystemdConfig::default(),
            python: default_python(),
        }
    }
}

/// Source repository settings shared by both deployers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RepoConfig {
    /// Clone URL. No default: the prompt requires a value when unset.
    pub url: Option<String>,
    pub branch: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self { url: None, branch: "main".to_string() }
    }
}

/// Single-instance layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SingleConfig {
    pub app_dir: PathBuf,
    pub service: String,
}

impl Default for SingleConfig {
    fn default() -> Self {
        Self {
            app_dir: PathBuf::from("/opt/avto-fix-bot"),
            service: "avto-fix-bot".to_string(),
        }
    }
}

/// Fleet layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FleetConfig {
    pub base_dir: PathBuf,
    pub service_prefix: String,
    /// Bot names offered as the default fleet list.
    pub bots: Vec<String>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("/opt/avto-fix-bots"),
            service_prefix: "avto-fix-bot-".to_string(),
            bots: Vec::new(),
        }
    }
}

/// Where units are written and who they run as.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SystemdConfig {
    pub unit_dir: PathBuf,
    pub user: Option<String>,
}

impl Default for SystemdConfig {
    fn default() -> Self {
        Self {
            unit_dir: PathBuf::from("/etc/systemd/system"),
            user: None,
        }
    }
}

fn default_python() -> String {
    "python3".to_string()
}

impl DeployConfig {
    /// Current value of a whitelisted key, rendered for display.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown.
    pub fn get(&self, key: &str) -> Result<String> {
        validate_config_key(key)?;
        Ok(match key {
            "repo.url" => self.repo.url.clone().unwrap_or_default(),
            "repo.branch" => self.repo.branch.clone(),
            "single.app_dir" => self.single.app_dir.display().to_string(),
            "single.service" => self.single.service.clone(),
            "fleet.base_dir" => self.fleet.base_dir.display().to_string(),
            "fleet.service_prefix" => self.fleet.service_prefix.clone(),
            "fleet.bots" => self.fleet.bots.join(","),
            "systemd.unit_dir" => self.systemd.unit_dir.display().to_string(),
            "systemd.user" => self.systemd.user.clone().unwrap_or_default(),
            _ => self.python.clone(),
        })
    }

    /// All settings in display order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        VALID_CONFIG_KEYS
            .iter()
            .map(|k| (*k, self.get(k).unwrap_or_default()))
            .collect()
    }

    /// Validate and apply `key = value`.
    ///
    /// An empty value clears optional settings (`repo.url`, `systemd.user`,
    /// `fleet.bots`).
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "repo.url" => self.repo.url = non_empty(value),
            "repo.branch" => self.repo.branch = value.to_string(),
            "single.app_dir" => self.single.app_dir = PathBuf::from(value),
            "single.service" => self.single.service = value.to_string(),
            "fleet.base_dir" => self.fleet.base_dir = PathBuf::from(value),
            "fleet.service_prefix" => self.fleet.service_prefix = value.to_string(),
            "fleet.bots" => {
                self.fleet.bots = if value.trim().is_empty() {
                    Vec::new()
                } else {
                    parse_bot_names(value)?
                };
            }
            "systemd.unit_dir" => self.systemd.unit_dir = PathBuf::from(value),
            "systemd.user" => self.systemd.user = non_empty(value),
            _ => self.python = value.to_string(),
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |reason: &str| -> Result<()> {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
        .into())
    };

    match key {
        "single.app_dir" | "fleet.base_dir" | "systemd.unit_dir" => {
            if !Path::new(value).is_absolute() {
                return invalid("Must be an absolute path.");
            }
        }
        "single.service" => {
            if validate_bot_name(value).is_err() {
                return invalid("Must match ^[A-Za-z0-9][A-Za-z0-9_.-]{0,63}$");
            }
        }
        "fleet.service_prefix" => {
            if !value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
            {
                return invalid("Only letters, digits, '_', '.' and '-' are allowed.");
            }
        }
        "repo.branch" | "python" => {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return invalid("Must be non-empty and contain no whitespace.");
            }
        }
        "systemd.user" | "repo.url" => {
            if value.trim().chars().any(char::is_whitespace) {
                return invalid("Must not contain whitespace.");
            }
        }
        _ => {}
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
