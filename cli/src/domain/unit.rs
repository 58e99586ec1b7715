//! systemd unit rendering: pure functions, no I/O, no async.
//!
//! The unit is always rendered in full; callers overwrite the file on disk
//! rather than patching it.

#![allow(clippy::format_push_string)]

use std::path::Path;

use crate::domain::instance::InstanceDescriptor;

/// Seconds systemd waits before restarting the bot.
pub const RESTART_SEC: u32 = 5;

/// Optional knobs that are not part of the instance descriptor.
#[derive(Debug, Clone, Default)]
pub struct UnitOptions<'a> {
    /// Run the bot as this user instead of root.
    pub user: Option<&'a str>,
}

/// Generate `<service>.service` content for a bot instance.
///
/// Returns the unit file string; does NOT write to disk.
#[must_use]
pub fn render(instance: &InstanceDescriptor, opts: &UnitOptions<'_>) -> String {
    let python = instance.venv_python();
    let entry = instance.entry_point();

    let mut out = String::new();
    out.push_str("# Generated by avtofix-deploy - DO NOT EDIT\n");
    out.push_str("[Unit]\n");
    out.push_str(&format!("Description=Avto Fix Bot ({})\n", instance.name));
    out.push_str("After=network-online.target\n");
    out.push_str("Wants=network-online.target\n");
    out.push('\n');
    out.push_str("[Service]\n");
    out.push_str("Type=simple\n");
    if let Some(user) = opts.user.filter(|u| !u.is_empty()) {
        out.push_str(&format!("User={user}\n"));
    }
    out.push_str(&format!(
        "WorkingDirectory={}\n",
        setting_path(&instance.app_dir)
    ));
    out.push_str(&format!(
        "EnvironmentFile={}\n",
        setting_path(&instance.env_file)
    ));
    out.push_str(&format!(
        "ExecStart={} {}\n",
        exec_arg(&python),
        exec_arg(&entry)
    ));
    out.push_str("Restart=always\n");
    out.push_str(&format!("RestartSec={RESTART_SEC}\n"));
    out.push('\n');
    out.push_str("[Install]\n");
    out.push_str("WantedBy=multi-user.target\n");

    out
}

/// Path as a plain setting value. systemd takes these verbatim to the end of
/// the line and does not unquote them; only `%` specifiers need escaping.
fn setting_path(path: &Path) -> String {
    path.to_string_lossy().replace('%', "%%")
}

/// Path as an `ExecStart=` argument. Command lines are split on whitespace,
/// so such paths are double-quoted.
fn exec_arg(path: &Path) -> String {
    let s = setting_path(path);
    if s.chars().any(char::is_whitespace) {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        s
    }
}
