//! `avtofix-deploy deploy`: provision and start a single bot instance.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::activation::SETTLE_DELAY;
use crate::application::services::config_service;
use crate::application::services::deploy::{DeployOptions, deploy_single};
use crate::application::services::env_config::read_value;
use crate::application::services::source_sync::RepoSpec;
use crate::commands::{resolve_repo_url, resolve_setting};
use crate::domain::InstanceDescriptor;
use crate::domain::env_file::{ADMIN_IDS, BOT_TOKEN, REQUEST_TIMEOUT_DEFAULTS, TARGET_CHAT};
use crate::domain::unit::UnitOptions;

/// Arguments for the deploy command. Anything not given is prompted for.
#[derive(Args)]
pub struct DeployArgs {
    /// Install directory
    #[arg(long)]
    pub app_dir: Option<PathBuf>,

    /// Git repository URL
    #[arg(long)]
    pub repo: Option<String>,

    /// Branch to deploy
    #[arg(long)]
    pub branch: Option<String>,

    /// systemd service name
    #[arg(long)]
    pub service: Option<String>,
}

/// Run the deploy command.
///
/// # Errors
///
/// Returns an error if a prompt fails, a value is invalid, or any
/// provisioning step fails.
pub async fn run(app: &AppContext, args: DeployArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;

    let app_dir = resolve_setting(
        app,
        "single.app_dir",
        "Install directory",
        &config.single.app_dir.display().to_string(),
        args.app_dir.map(|p| p.display().to_string()),
    )?;
    let url = resolve_repo_url(app, &config, args.repo)?;
    let branch = resolve_setting(app, "repo.branch", "Branch", &config.repo.branch, args.branch)?;
    let service = resolve_setting(
        app,
        "single.service",
        "Service name",
        &config.single.service,
        args.service,
    )?;

    let instance = InstanceDescriptor::single(&PathBuf::from(app_dir), &service);
    let env = collect_env(app, &instance)?;
    let env_refs: Vec<(&str, &str)> = env.iter().map(|(k, v)| (*k, v.as_str())).collect();

    tracing::info!(service = %instance.service, app_dir = %instance.app_dir.display(), "single deploy");

    let reporter = app.reporter();
    let opts = DeployOptions {
        reporter: &reporter,
        repo: RepoSpec {
            url: &url,
            branch: &branch,
        },
        python: &config.python,
        unit_dir: &config.systemd.unit_dir,
        unit: UnitOptions {
            user: config.systemd.user.as_deref(),
        },
        settle: SETTLE_DELAY,
    };
    let report = deploy_single(&app.host, &app.fs, &instance, &env_refs, &opts).await?;
    drop(reporter);

    app.renderer().render_deploy(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Prompt for every bot setting, defaulting to what the env file already
/// holds. An empty token keeps the current one.
fn collect_env(
    app: &AppContext,
    instance: &InstanceDescriptor,
) -> Result<Vec<(&'static str, String)>> {
    let current = |key: &str| read_value(&app.fs, &instance.env_file, key);

    let existing_token = current(BOT_TOKEN)?.unwrap_or_default();
    let prompt = if existing_token.is_empty() {
        "BOT_TOKEN".to_string()
    } else {
        "BOT_TOKEN (empty keeps the current token)".to_string()
    };
    let entered = app.secret(&prompt)?;
    let token = if entered.is_empty() {
        existing_token
    } else {
        entered
    };

    let mut env = vec![(BOT_TOKEN, token)];
    for key in [TARGET_CHAT, ADMIN_IDS] {
        let default = current(key)?.unwrap_or_default();
        env.push((key, app.input(key, &default)?));
    }
    for &(key, fallback) in REQUEST_TIMEOUT_DEFAULTS {
        let default = current(key)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        env.push((key, app.input(key, &default)?));
    }
    Ok(env)
}
