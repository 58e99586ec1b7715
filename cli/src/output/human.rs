//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::application::services::activation::Activation;
use crate::application::services::deploy::InstanceReport;
use crate::application::services::fleet_status::InstanceStatus;
use crate::application::services::preflight::ToolCheck;
use crate::application::services::source_sync::SyncOutcome;
use crate::domain::DeployConfig;
use crate::domain::InstanceState;
use crate::domain::bot_env::{EnvIssue, Severity};
use crate::output::OutputContext;

/// Renders results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the outcome of a single-instance deploy.
    pub fn render_deploy(&self, report: &InstanceReport) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header(&format!("Deployed {}", report.service));
        self.ctx.kv("Directory:", &report.app_dir.display().to_string());
        self.ctx.kv("Source:", sync_display(report.sync));
        self.ctx.kv("Env file:", &report.env_file.display().to_string());
        self.ctx.kv("Unit:", &report.unit_file.display().to_string());
        self.ctx.kv("Status:", &activation_display(&report.activation));
        println!();
        self.ctx.info(&format!("Logs: journalctl -u {} -f", report.service));
    }

    /// Render the end-of-run summary of a fleet deploy.
    pub fn render_fleet(&self, reports: &[InstanceReport]) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header("Fleet summary:");
        for report in reports {
            println!(
                "    {:<24} {:<10} {}",
                report.name,
                self.state_styled(report.state),
                activation_display(&report.activation)
            );
        }
        let pending: Vec<&InstanceReport> = reports
            .iter()
            .filter(|r| r.state == InstanceState::PendingManualStart)
            .collect();
        if !pending.is_empty() {
            println!();
            self.ctx.warn(&format!(
                "{} waiting for a bot token",
                pluralize(pending.len(), "instance", "instances")
            ));
            for report in pending {
                println!(
                    "    edit {}, then: systemctl start {}",
                    report.env_file.display(),
                    report.service
                );
            }
        }
    }

    /// Render the per-instance status table.
    pub fn render_status(&self, statuses: &[InstanceStatus]) {
        if statuses.is_empty() {
            self.ctx.info("No bots configured. Run: avtofix-deploy fleet");
            return;
        }
        println!(
            "  {}",
            format!(
                "{:<24} {:<22} {:<12} {:<10} {}",
                "NAME", "STATE", "TOKEN", "ACTIVE", "BLOCKED"
            )
            .style(self.ctx.styles.dim)
        );
        for s in statuses {
            println!(
                "  {:<24} {:<22} {:<12} {:<10} {}",
                s.name,
                s.state.label(),
                s.token.label(),
                s.active,
                s.blocked_users
            );
        }
    }

    /// Render the deployer configuration.
    pub fn render_config(&self, config: &DeployConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        for (key, value) in config.entries() {
            let shown = if value.is_empty() {
                "(not set)".to_string()
            } else {
                value
            };
            println!("  {:<22} {shown}", format!("{key}:"));
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["AVTOFIX_CONFIG", "AVTOFIX_LOG", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }

    /// Render required-tool availability.
    pub fn render_doctor(&self, checks: &[ToolCheck]) {
        println!();
        println!("  {}", "Prerequisites:".style(self.ctx.styles.header));
        for check in checks {
            let msg = match &check.version {
                Some(v) if !v.is_empty() => format!("{} ({v})", check.name),
                _ if check.available => check.name.clone(),
                _ => format!("{} not found", check.name),
            };
            self.print_check(check.available, &msg);
        }
        println!();
        let missing = checks.iter().filter(|c| !c.available).count();
        if missing == 0 {
            println!(
                "  {} Everything looks good!",
                "\u{2713}".style(self.ctx.styles.success)
            );
        } else {
            println!(
                "  {} {} missing.",
                "\u{2717}".style(self.ctx.styles.error),
                pluralize(missing, "tool", "tools")
            );
        }
        println!();
    }

    /// Render the findings of `env check`.
    pub fn render_env_check(&self, path: &Path, issues: &[EnvIssue]) {
        if issues.is_empty() {
            self.ctx.success(&format!("{} looks good", path.display()));
            return;
        }
        for issue in issues {
            let line = format!("{}: {}", issue.key, issue.message);
            match issue.severity {
                Severity::Error => self.ctx.error(&line),
                Severity::Warning => self.ctx.warn(&line),
            }
        }
    }

    /// Render the confirmation of `env set`.
    pub fn render_env_set(&self, path: &Path, key: &str) {
        self.ctx.success(&format!("{key} set in {}", path.display()));
    }

    fn state_styled(&self, state: InstanceState) -> String {
        let style = match state {
            InstanceState::Running => self.ctx.styles.success,
            InstanceState::PendingManualStart => self.ctx.styles.warning,
            InstanceState::Stopped | InstanceState::Absent => self.ctx.styles.error,
        };
        format!("{}", state.label().style(style))
    }

    fn print_check(&self, ok: bool, msg: &str) {
        if ok {
            println!("    {} {msg}", "\u{2713}".style(self.ctx.styles.success));
        } else {
            println!("    {} {msg}", "\u{2717}".style(self.ctx.styles.error));
        }
    }
}

// ── Display helpers (used by tests and output layer) ─────────────────────────

#[must_use]
pub fn sync_display(sync: SyncOutcome) -> &'static str {
    match sync {
        SyncOutcome::Cloned => "cloned",
        SyncOutcome::Updated => "updated",
    }
}

#[must_use]
pub fn activation_display(activation: &Activation) -> String {
    match activation {
        Activation::Started { status } => status.clone(),
        Activation::Deferred { token } => format!("not started (token {})", token.label()),
    }
}

#[must_use]
pub fn pluralize(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}
