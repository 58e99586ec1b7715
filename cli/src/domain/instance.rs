//! Instance descriptors and the naming conventions they are derived from.
//!
//! Pure functions only. No I/O or async.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DeployError;

/// Virtual environment directory inside the instance directory.
pub const VENV_DIR: &str = ".venv";
/// Bot entry point executed by the service.
pub const ENTRY_POINT: &str = "index.py";
/// Pinned dependency list installed into the virtual environment.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";
/// Environment file read by systemd at service start.
pub const ENV_FILE: &str = ".env";
/// Blocklist maintained by the bot process itself.
pub const BLOCKLIST_FILE: &str = "blocked_users.json";

/// Bot names become directory and unit names, so they are kept to a
/// conservative character set.
pub static BOT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{0,63}$").expect("valid regex")
});

/// Everything needed to provision one bot instance.
///
/// Rebuilt on every run from a name and a directory; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDescriptor {
    /// Human name of the bot (fleet entry or single-instance service name).
    pub name: String,
    /// Git working tree the bot runs from.
    pub app_dir: PathBuf,
    /// Env file loaded by systemd (`<app_dir>/.env`).
    pub env_file: PathBuf,
    /// systemd unit name without the `.service` suffix.
    pub service: String,
}

impl InstanceDescriptor {
    /// Descriptor for the single-instance layout.
    #[must_use]
    pub fn single(app_dir: &Path, service: &str) -> Self {
        Self {
            name: service.to_string(),
            app_dir: app_dir.to_path_buf(),
            env_file: app_dir.join(ENV_FILE),
            service: service.to_string(),
        }
    }

    /// Descriptor for a fleet member: `<base_dir>/<name>`, unit `<prefix><name>`.
    #[must_use]
    pub fn fleet_member(base_dir: &Path, name: &str, service_prefix: &str) -> Self {
        let app_dir = base_dir.join(name);
        Self {
            name: name.to_string(),
            env_file: app_dir.join(ENV_FILE),
            app_dir,
            service: format!("{service_prefix}{name}"),
        }
    }

    #[must_use]
    pub fn venv_dir(&self) -> PathBuf {
        self.app_dir.join(VENV_DIR)
    }

    /// Interpreter inside the virtual environment.
    #[must_use]
    pub fn venv_python(&self) -> PathBuf {
        self.venv_dir().join("bin").join("python")
    }

    #[must_use]
    pub fn entry_point(&self) -> PathBuf {
        self.app_dir.join(ENTRY_POINT)
    }

    #[must_use]
    pub fn requirements(&self) -> PathBuf {
        self.app_dir.join(REQUIREMENTS_FILE)
    }

    #[must_use]
    pub fn blocklist(&self) -> PathBuf {
        self.app_dir.join(BLOCKLIST_FILE)
    }

    /// File name of the unit, e.g. `avto-fix-bot.service`.
    #[must_use]
    pub fn unit_file_name(&self) -> String {
        format!("{}.service", self.service)
    }
}

/// Lifecycle of a fleet instance as observed by the deployer.
///
/// `Absent → Stopped → Running | PendingManualStart`; nothing here moves an
/// instance back to `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceState {
    /// No working tree at `app_dir`.
    Absent,
    /// Provisioned and enabled but not running.
    Stopped,
    /// Started and reported active by systemd.
    Running,
    /// Enabled but held back until a real token is filled in.
    PendingManualStart,
}

impl InstanceState {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::PendingManualStart => "pending manual start",
        }
    }
}

/// Validates a bot or service name.
///
/// # Errors
///
/// Returns an error if the name could escape the base directory or is not a
/// usable unit name.
pub fn validate_bot_name(name: &str) -> Result<(), DeployError> {
    if BOT_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(DeployError::InvalidBotName(name.to_string()))
    }
}

/// Parse the fleet list entered at the prompt: names separated by commas
/// and/or whitespace, order kept.
///
/// # Errors
///
/// Returns an error if the list is empty, a name is invalid, or a name is
/// repeated.
pub fn parse_bot_names(raw: &str) -> Result<Vec<String>, DeployError> {
    let mut names: Vec<String> = Vec::new();
    for name in raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
    {
        validate_bot_name(name)?;
        if names.iter().any(|n| n == name) {
            return Err(DeployError::DuplicateBotName(name.to_string()));
        }
        names.push(name.to_string());
    }
    if names.is_empty() {
        return Err(DeployError::EmptyFleet);
    }
    Ok(names)
}

/// Build descriptors for every fleet member, in input order.
#[must_use]
pub fn fleet(base_dir: &Path, names: &[String], service_prefix: &str) -> Vec<InstanceDescriptor> {
    names
        .iter()
        .map(|n| InstanceDescriptor::fleet_member(base_dir, n, service_prefix))
        .collect()
}
