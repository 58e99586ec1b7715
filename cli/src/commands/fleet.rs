//! `avtofix-deploy fleet`: provision a set of named bot instances.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::activation::SETTLE_DELAY;
use crate::application::services::config_service;
use crate::application::services::deploy::{DeployOptions, deploy_fleet};
use crate::application::services::source_sync::RepoSpec;
use crate::commands::{resolve_repo_url, resolve_setting};
use crate::domain::instance::{fleet, parse_bot_names};
use crate::domain::unit::UnitOptions;

/// Arguments for the fleet command. Anything not given is prompted for.
#[derive(Args)]
pub struct FleetArgs {
    /// Bot names, comma or space separated
    #[arg(long)]
    pub bots: Option<String>,

    /// Directory holding one subdirectory per bot
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Git repository URL
    #[arg(long)]
    pub repo: Option<String>,

    /// Branch to deploy
    #[arg(long)]
    pub branch: Option<String>,

    /// Prefix for systemd service names
    #[arg(long)]
    pub prefix: Option<String>,
}

/// Run the fleet command.
///
/// # Errors
///
/// Returns an error if a prompt fails, a value is invalid, or any
/// provisioning step other than a service start fails.
pub async fn run(app: &AppContext, args: FleetArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;

    let base_dir = resolve_setting(
        app,
        "fleet.base_dir",
        "Base directory",
        &config.fleet.base_dir.display().to_string(),
        args.base_dir.map(|p| p.display().to_string()),
    )?;
    let url = resolve_repo_url(app, &config, args.repo)?;
    let branch = resolve_setting(app, "repo.branch", "Branch", &config.repo.branch, args.branch)?;
    let prefix = resolve_setting(
        app,
        "fleet.service_prefix",
        "Service prefix",
        &config.fleet.service_prefix,
        args.prefix,
    )?;
    let raw_names = match args.bots {
        Some(raw) => raw,
        None => app.input("Bot names (comma or space separated)", &config.fleet.bots.join(","))?,
    };
    let names = parse_bot_names(&raw_names)?;

    let instances = fleet(&PathBuf::from(base_dir), &names, &prefix);
    tracing::info!(count = instances.len(), prefix = %prefix, "fleet deploy");

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
    let reports = deploy_fleet(&app.host, &app.fs, &instances, &opts).await?;
    drop(reporter);

    app.renderer().render_fleet(&reports)?;
    Ok(ExitCode::SUCCESS)
}
