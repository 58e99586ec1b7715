//! Application service: single-instance and fleet deploy use-cases.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{HostToolchain, LocalFs, ProgressReporter};
use crate::application::services::activation::{self, Activation};
use crate::application::services::env_config::{ensure_env_keys, upsert_env};
use crate::application::services::preflight::{required_tools, require_tools};
use crate::application::services::runtime::provision_runtime;
use crate::application::services::source_sync::{RepoSpec, SyncOutcome, sync_source};
use crate::application::services::unit_install::install_unit;
use crate::domain::env_file::{ADMIN_IDS, BOT_TOKEN, REQUEST_TIMEOUT_DEFAULTS, TARGET_CHAT};
use crate::domain::unit::UnitOptions;
use crate::domain::{InstanceDescriptor, InstanceState};

/// Settings shared by both deployers.
pub struct DeployOptions<'a, R: ProgressReporter> {
    pub reporter: &'a R,
    pub repo: RepoSpec<'a>,
    /// Interpreter used to create the virtual environment.
    pub python: &'a str,
    pub unit_dir: &'a Path,
    pub unit: UnitOptions<'a>,
    /// Pause between starting a unit and querying its state.
    pub settle: Duration,
}

/// What happened to one instance.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceReport {
    pub name: String,
    pub service: String,
    pub app_dir: PathBuf,
    pub env_file: PathBuf,
    pub unit_file: PathBuf,
    pub sync: SyncOutcome,
    pub venv_created: bool,
    pub activation: Activation,
    pub state: InstanceState,
}

/// Deploy one bot with the values collected at the prompts.
///
/// `env` is upserted as given, so every listed key ends up with exactly the
/// supplied value. The service is (re)started unconditionally and a failed
/// start aborts the run.
///
/// # Errors
///
/// Returns an error on the first failing step: missing tool, git failure,
/// install failure, env/unit write failure or service start failure.
pub async fn deploy_single(
    host: &impl HostToolchain,
    fs: &impl LocalFs,
    instance: &InstanceDescriptor,
    env: &[(&str, &str)],
    opts: &DeployOptions<'_, impl ProgressReporter>,
) -> Result<InstanceReport> {
    require_tools(host, &required_tools(opts.python)).await?;

    let (sync, venv_created) = provision(host, fs, instance, opts).await?;

    opts.reporter.step("writing environment...");
    upsert_env(fs, &instance.env_file, env)?;
    opts.reporter
        .success(&format!("{} updated", instance.env_file.display()));

    let unit_file = install_unit(host, fs, opts.reporter, instance, opts.unit_dir, &opts.unit).await?;
    let activation = activation::activate(host, opts.reporter, instance, opts.settle).await?;

    Ok(report(instance, unit_file, sync, venv_created, activation))
}

/// Keys every fleet member gets on first deploy: secrets blank for manual
/// fill-in, request timeouts at the bot's defaults.
#[must_use]
pub fn fleet_env_defaults() -> Vec<(&'static str, &'static str)> {
    let mut pairs = vec![(BOT_TOKEN, ""), (TARGET_CHAT, ""), (ADMIN_IDS, "")];
    pairs.extend_from_slice(REQUEST_TIMEOUT_DEFAULTS);
    pairs
}

/// Deploy every fleet member in order, one at a time.
///
/// Existing env values are never overwritten. Each unit is started only when
/// its token looks real; start failures are reported as warnings. Any other
/// failure aborts the run and leaves later instances untouched.
///
/// # Errors
///
/// Returns an error on the first failing step other than a service start.
pub async fn deploy_fleet(
    host: &impl HostToolchain,
    fs: &impl LocalFs,
    instances: &[InstanceDescriptor],
    opts: &DeployOptions<'_, impl ProgressReporter>,
) -> Result<Vec<InstanceReport>> {
    require_tools(host, &required_tools(opts.python)).await?;

    let defaults = fleet_env_defaults();
    let mut reports = Vec::with_capacity(instances.len());
    for (i, instance) in instances.iter().enumerate() {
        tracing::info!(instance = %instance.name, index = i + 1, total = instances.len(), "deploying");
        opts.reporter.step(&format!(
            "[{}/{}] {}",
            i + 1,
            instances.len(),
            instance.name
        ));

        let (sync, venv_created) = provision(host, fs, instance, opts)
            .await
            .with_context(|| format!("deploying {}", instance.name))?;
        ensure_env_keys(fs, &instance.env_file, &defaults)
            .with_context(|| format!("deploying {}", instance.name))?;
        let unit_file = install_unit(host, fs, opts.reporter, instance, opts.unit_dir, &opts.unit)
            .await
            .with_context(|| format!("deploying {}", instance.name))?;
        let activation =
            activation::activate_if_token(host, fs, opts.reporter, instance, opts.settle)
                .await
                .with_context(|| format!("deploying {}", instance.name))?;

        reports.push(report(instance, unit_file, sync, venv_created, activation));
    }
    Ok(reports)
}

async fn provision(
    host: &impl HostToolchain,
    fs: &impl LocalFs,
    instance: &InstanceDescriptor,
    opts: &DeployOptions<'_, impl ProgressReporter>,
) -> Result<(SyncOutcome, bool)> {
    let sync = sync_source(host, fs, opts.reporter, instance, opts.repo).await?;
    let venv_created = provision_runtime(host, fs, opts.reporter, instance, opts.python).await?;
    Ok((sync, venv_created))
}

fn report(
    instance: &InstanceDescriptor,
    unit_file: PathBuf,
    sync: SyncOutcome,
    venv_created: bool,
    activation: Activation,
) -> InstanceReport {
    InstanceReport {
        name: instance.name.clone(),
        service: instance.service.clone(),
        app_dir: instance.app_dir.clone(),
        env_file: instance.env_file.clone(),
        unit_file,
        sync,
        venv_created,
        state: activation.state(),
        activation,
    }
}
