//! Runtime provisioning: virtual environment and pinned dependencies.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, ProgressReporter, PythonRuntime};
use crate::domain::InstanceDescriptor;

/// Ensure the instance's virtual environment exists and holds the pinned
/// dependencies.
///
/// The environment is created only when its interpreter is missing, so
/// redeploys reuse it. Returns `true` when a new environment was created.
///
/// # Errors
///
/// Returns an error if venv creation, the pip upgrade, or the requirements
/// install fails.
pub async fn provision_runtime(
    py: &impl PythonRuntime,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    instance: &InstanceDescriptor,
    python: &str,
) -> Result<bool> {
    let venv_python = instance.venv_python();

    let created = if fs.exists(&venv_python) {
        tracing::debug!(instance = %instance.name, "reusing virtual environment");
        false
    } else {
        reporter.step("creating virtual environment...");
        py.create_venv(python, &instance.venv_dir())
            .await
            .context("creating virtual environment")?;
        true
    };

    reporter.step("upgrading pip...");
    py.upgrade_pip(&venv_python)
        .await
        .context("upgrading pip")?;

    reporter.step("installing dependencies...");
    py.install_requirements(&venv_python, &instance.requirements())
        .await
        .context("installing dependencies")?;

    tracing::info!(instance = %instance.name, venv_created = created, "runtime ready");
    reporter.success(if created {
        "virtual environment created and dependencies installed"
    } else {
        "dependencies installed"
    });
    Ok(created)
}
