//! `avtofix-deploy status`: read-only report of every fleet instance.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::application::services::fleet_status::collect_status;
use crate::domain::InstanceDescriptor;
use crate::domain::instance::{fleet, parse_bot_names};

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Bot names to inspect (defaults to `fleet.bots` from the config)
    #[arg(long)]
    pub bots: Option<String>,

    /// Directory holding one subdirectory per bot
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Inspect the single-instance deployment instead of the fleet
    #[arg(long, conflicts_with_all = ["bots", "base_dir"])]
    pub single: bool,
}

/// Run the status command.
///
/// # Errors
///
/// Returns an error if the config or an instance file cannot be read.
pub async fn run(app: &AppContext, args: StatusArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;

    let instances = if args.single {
        vec![InstanceDescriptor::single(
            &config.single.app_dir,
            &config.single.service,
        )]
    } else {
        let names = match args.bots {
            Some(raw) => parse_bot_names(&raw)?,
            None => config.fleet.bots.clone(),
        };
        let base_dir = args.base_dir.unwrap_or_else(|| config.fleet.base_dir.clone());
        fleet(&base_dir, &names, &config.fleet.service_prefix)
    };

    let statuses =
        collect_status(&app.host, &app.fs, &instances, &config.systemd.unit_dir).await?;
    app.renderer().render_status(&statuses)?;
    Ok(ExitCode::SUCCESS)
}
