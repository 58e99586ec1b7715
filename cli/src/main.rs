//! avtofix-deploy - provision and run Avto Fix Bot instances under systemd

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use avtofix_deploy::cli::Cli;
use avtofix_deploy::domain::DeployError;
use avtofix_deploy::output::json::format_error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("AVTOFIX_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            let code = e
                .downcast_ref::<DeployError>()
                .map_or(1, DeployError::exit_code);
            tracing::debug!(error = ?e, code, "command failed");
            if json {
                match format_error(&format!("{e:#}"), code) {
                    Ok(text) => println!("{text}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
