//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Provision and run Avto Fix Bot instances under systemd
#[derive(Parser)]
#[command(
    name = "avtofix-deploy",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Skip prompts and take the defaults
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deploy a single bot instance
    Deploy(commands::deploy::DeployArgs),

    /// Deploy a fleet of named bot instances
    Fleet(commands::fleet::FleetArgs),

    /// Show the state of every fleet instance
    Status(commands::status::StatusArgs),

    /// Edit or validate a bot's .env file
    #[command(subcommand)]
    Env(commands::env::EnvCommand),

    /// Manage deployer defaults
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Check that git, python and systemctl are available
    Doctor,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        });

        match command {
            Command::Deploy(args) => commands::deploy::run(&app, args).await,
            Command::Fleet(args) => commands::fleet::run(&app, args).await,
            Command::Status(args) => commands::status::run(&app, args).await,
            Command::Env(cmd) => commands::env::run(&app, cmd),
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Doctor => commands::doctor::run(&app).await,
        }
    }
}
