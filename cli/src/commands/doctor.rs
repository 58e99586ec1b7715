//! `avtofix-deploy doctor`: check the host tools a deploy needs.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::application::services::preflight::{check_tools, required_tools};

/// Run the doctor command. Exits non-zero when a tool is missing.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let checks = check_tools(&app.host, &required_tools(&config.python)).await;
    app.renderer().render_doctor(&checks)?;
    if checks.iter().all(|c| c.available) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
