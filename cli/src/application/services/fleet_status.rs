//! Application service: read-only per-instance status.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{LocalFs, ServiceManager};
use crate::application::services::env_config::read_token_state;
use crate::domain::{InstanceDescriptor, InstanceState, TokenState, blocklist};

/// Observed state of one instance.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceStatus {
    pub name: String,
    pub service: String,
    pub app_dir: PathBuf,
    pub state: InstanceState,
    pub token: TokenState,
    pub unit_installed: bool,
    /// Raw `systemctl is-active` answer.
    pub active: String,
    /// Entries in the bot's blocklist file.
    pub blocked_users: usize,
}

/// Inspect every instance without changing anything.
///
/// # Errors
///
/// Returns an error if an env file exists but cannot be read. An unreadable
/// blocklist counts as empty.
pub async fn collect_status(
    services: &impl ServiceManager,
    fs: &impl LocalFs,
    instances: &[InstanceDescriptor],
    unit_dir: &Path,
) -> Result<Vec<InstanceStatus>> {
    let mut out = Vec::with_capacity(instances.len());
    for instance in instances {
        out.push(instance_status(services, fs, instance, unit_dir).await?);
    }
    Ok(out)
}

async fn instance_status(
    services: &impl ServiceManager,
    fs: &impl LocalFs,
    instance: &InstanceDescriptor,
    unit_dir: &Path,
) -> Result<InstanceStatus> {
    let present = fs.exists(&instance.app_dir);
    let unit_installed = fs.exists(&unit_dir.join(instance.unit_file_name()));
    let token = read_token_state(fs, &instance.env_file)?;

    let active = if unit_installed {
        services
            .is_active(&instance.service)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(service = %instance.service, error = %e, "is-active query failed");
                "unknown".to_string()
            })
    } else {
        "inactive".to_string()
    };

    let blocked_users = match fs.read_to_string(&instance.blocklist()) {
        Ok(content) => content.map_or(0, |c| blocklist::parse(&c).len()),
        Err(e) => {
            tracing::warn!(instance = %instance.name, error = %e, "unreadable blocklist counted as empty");
            0
        }
    };

    Ok(InstanceStatus {
        name: instance.name.clone(),
        service: instance.service.clone(),
        app_dir: instance.app_dir.clone(),
        state: derive_state(present, &active, token),
        token,
        unit_installed,
        active,
        blocked_users,
    })
}

fn derive_state(present: bool, active: &str, token: TokenState) -> InstanceState {
    if !present {
        InstanceState::Absent
    } else if active == "active" {
        InstanceState::Running
    } else if token.can_start() {
        InstanceState::Stopped
    } else {
        InstanceState::PendingManualStart
    }
}
