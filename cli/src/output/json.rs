//! JSON output helpers.
//!
//! `JsonRenderer` prints every result as one pretty-printed document on
//! stdout; `format_error` builds the error object used by all `--json` code
//! paths when a command fails.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::services::deploy::InstanceReport;
use crate::application::services::fleet_status::InstanceStatus;
use crate::application::services::preflight::ToolCheck;
use crate::domain::DeployConfig;
use crate::domain::bot_env::EnvIssue;

/// Renders results as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_deploy(&self, report: &InstanceReport) -> Result<()> {
        print_json(report)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_fleet(&self, reports: &[InstanceReport]) -> Result<()> {
        print_json(&serde_json::json!({ "instances": reports }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_status(&self, statuses: &[InstanceStatus]) -> Result<()> {
        print_json(&serde_json::json!({ "instances": statuses }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &DeployConfig, path: &Path) -> Result<()> {
        print_json(&serde_json::json!({
            "path": path,
            "config": config,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_doctor(&self, checks: &[ToolCheck]) -> Result<()> {
        print_json(&serde_json::json!({
            "ok": checks.iter().all(|c| c.available),
            "tools": checks,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_env_check(&self, path: &Path, issues: &[EnvIssue]) -> Result<()> {
        print_json(&serde_json::json!({
            "path": path,
            "issues": issues,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_env_set(&self, path: &Path, key: &str) -> Result<()> {
        print_json(&serde_json::json!({
            "path": path,
            "key": key,
            "updated": true,
        }))
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{text}");
    Ok(())
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": 1
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: i32) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
