//! Required-tool checks run before any instance is touched.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::ToolProbe;
use crate::domain::DeployError;

/// Programs every deploy needs, given the configured Python interpreter.
#[must_use]
pub fn required_tools(python: &str) -> Vec<String> {
    vec!["git".to_string(), python.to_string(), "systemctl".to_string()]
}

/// Availability of one tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCheck {
    pub name: String,
    pub available: bool,
    /// First line of `--version` output, when available.
    pub version: Option<String>,
}

/// Probe every tool and report all of them, missing or not.
pub async fn check_tools(probe: &impl ToolProbe, tools: &[String]) -> Vec<ToolCheck> {
    let mut checks = Vec::with_capacity(tools.len());
    for name in tools {
        let version = probe.probe(name).await;
        tracing::debug!(tool = %name, available = version.is_some(), "probed tool");
        checks.push(ToolCheck {
            name: name.clone(),
            available: version.is_some(),
            version,
        });
    }
    checks
}

/// Fail on the first missing tool.
///
/// # Errors
///
/// Returns [`DeployError::MissingTool`] naming the first tool that cannot be
/// executed.
pub async fn require_tools(probe: &impl ToolProbe, tools: &[String]) -> Result<()> {
    for name in tools {
        if probe.probe(name).await.is_none() {
            tracing::error!(tool = %name, "required tool missing");
            return Err(DeployError::MissingTool(name.clone()).into());
        }
    }
    Ok(())
}
