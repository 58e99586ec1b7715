//! Service activation: unconditional for the single deployer, gated on the
//! token for fleet members.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{LocalFs, ProgressReporter, ServiceManager};
use crate::application::services::env_config::read_token_state;
use crate::domain::{InstanceDescriptor, InstanceState, TokenState};

/// How long to wait after a (re)start before asking systemd for the state.
pub const SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Result of an activation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activation {
    /// A start was attempted; `status` is what `systemctl is-active` said
    /// after the settle delay.
    Started { status: String },
    /// The unit was enabled but not started because of the token.
    Deferred { token: TokenState },
}

impl Activation {
    /// Instance state implied by this outcome.
    #[must_use]
    pub fn state(&self) -> InstanceState {
        match self {
            Self::Started { status } if status == "active" => InstanceState::Running,
            Self::Started { .. } => InstanceState::Stopped,
            Self::Deferred { .. } => InstanceState::PendingManualStart,
        }
    }
}

/// Enable and (re)start the unit; any failure is fatal.
///
/// # Errors
///
/// Returns an error if enabling or starting the unit fails.
pub async fn activate(
    services: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    instance: &InstanceDescriptor,
    settle: Duration,
) -> Result<Activation> {
    let service = instance.service.as_str();
    reporter.step(&format!("starting {service}..."));
    services
        .enable(service)
        .await
        .with_context(|| format!("enabling {service}"))?;
    services
        .restart(service)
        .await
        .with_context(|| format!("starting {service}"))?;
    Ok(settle_and_report(services, reporter, service, settle).await)
}

/// Enable the unit and start it only when `BOT_TOKEN` looks real.
///
/// A failed start is downgraded to a warning so the rest of the fleet still
/// gets provisioned. With an unset or placeholder token the unit is left
/// enabled but stopped, and the manual follow-up is printed.
///
/// # Errors
///
/// Returns an error if the env file cannot be read or the unit cannot be
/// enabled.
pub async fn activate_if_token(
    services: &impl ServiceManager,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    instance: &InstanceDescriptor,
    settle: Duration,
) -> Result<Activation> {
    let service = instance.service.as_str();
    let token = read_token_state(fs, &instance.env_file)?;

    services
        .enable(service)
        .await
        .with_context(|| format!("enabling {service}"))?;

    if !token.can_start() {
        tracing::info!(service, token = token.label(), "start deferred");
        reporter.warn(&format!(
            "{service} not started: BOT_TOKEN is {}",
            token.label()
        ));
        reporter.info(&format!(
            "fill in BOT_TOKEN in {}, then run: systemctl start {service}",
            instance.env_file.display()
        ));
        return Ok(Activation::Deferred { token });
    }

    reporter.step(&format!("starting {service}..."));
    if let Err(e) = services.restart(service).await {
        tracing::warn!(service, error = %e, "start failed");
        reporter.warn(&format!("{service} failed to start: {e:#}"));
    }
    Ok(settle_and_report(services, reporter, service, settle).await)
}

async fn settle_and_report(
    services: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    service: &str,
    settle: Duration,
) -> Activation {
    if !settle.is_zero() {
        tokio::time::sleep(settle).await;
    }
    let status = match services.is_active(service).await {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(service, error = %e, "is-active query failed");
            "unknown".to_string()
        }
    };
    if status == "active" {
        reporter.success(&format!("{service} is active"));
    } else {
        reporter.warn(&format!(
            "{service} is {status}; inspect with: journalctl -u {service} -n 50"
        ));
    }
    Activation::Started { status }
}
