//! Service unit installation.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, ProgressReporter, ServiceManager};
use crate::domain::InstanceDescriptor;
use crate::domain::unit::{self, UnitOptions};

/// Render the unit for `instance`, overwrite `<unit_dir>/<service>.service`
/// and reload systemd. Returns the unit file path.
///
/// # Errors
///
/// Returns an error if the unit cannot be written or `daemon-reload` fails.
pub async fn install_unit(
    services: &impl ServiceManager,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    instance: &InstanceDescriptor,
    unit_dir: &Path,
    opts: &UnitOptions<'_>,
) -> Result<PathBuf> {
    let path = unit_dir.join(instance.unit_file_name());
    let content = unit::render(instance, opts);

    reporter.step(&format!("writing {}...", path.display()));
    fs.create_dir_all(unit_dir)?;
    fs.write(&path, &content)?;
    services
        .daemon_reload()
        .await
        .context("reloading systemd units")?;

    tracing::info!(service = %instance.service, path = %path.display(), "unit installed");
    reporter.success(&format!("unit {} installed", instance.unit_file_name()));
    Ok(path)
}
