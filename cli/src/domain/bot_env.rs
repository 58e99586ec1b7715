//! Validation of a bot env file against the way the bot reads it.
//!
//! The bot tolerates most mistakes (it drops bad admin ids, falls back to
//! printing requests when the target chat is unusable) so these checks
//! surface problems that would otherwise only show up in its logs.

use crate::domain::env_file::{
    ADMIN_IDS, BOT_TOKEN, REQUEST_TIMEOUT_DEFAULTS, TARGET_CHAT, TokenState,
};

/// How serious an [`EnvIssue`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A single finding from [`check`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EnvIssue {
    pub severity: Severity,
    pub key: String,
    pub message: String,
}

impl EnvIssue {
    fn error(key: &str, message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, key: key.to_string(), message: message.into() }
    }

    fn warning(key: &str, message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, key: key.to_string(), message: message.into() }
    }
}

/// Parse `ADMIN_IDS` the way the bot does: comma separated integers, blank
/// chunks skipped. Returns the valid ids and the chunks that were rejected.
#[must_use]
pub fn parse_admin_ids(raw: &str) -> (Vec<i64>, Vec<String>) {
    let mut ids = Vec::new();
    let mut invalid = Vec::new();
    for chunk in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        match chunk.parse::<i64>() {
            Ok(id) if !ids.contains(&id) => ids.push(id),
            Ok(_) => {}
            Err(_) => invalid.push(chunk.to_string()),
        }
    }
    (ids, invalid)
}

/// Check resolved variables. `lookup` returns the value the bot would see.
#[must_use]
pub fn check<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Vec<EnvIssue> {
    let mut issues = Vec::new();

    match TokenState::classify(lookup(BOT_TOKEN)) {
        TokenState::Unset => issues.push(EnvIssue::error(
            BOT_TOKEN,
            "not set; the bot refuses to start",
        )),
        TokenState::Placeholder => issues.push(EnvIssue::error(
            BOT_TOKEN,
            "looks like a placeholder (shorter than 20 characters)",
        )),
        TokenState::Valid => {}
    }

    match lookup(TARGET_CHAT).map(str::trim) {
        None | Some("") => issues.push(EnvIssue::warning(
            TARGET_CHAT,
            "empty; requests will be printed to the service log instead of sent",
        )),
        Some(v) if v.parse::<i64>().is_err() => issues.push(EnvIssue::warning(
            TARGET_CHAT,
            format!("must be an integer chat id, got '{v}'; requests will not be delivered"),
        )),
        Some(_) => {}
    }

    let (admins, invalid) = parse_admin_ids(lookup(ADMIN_IDS).unwrap_or_default());
    for chunk in invalid {
        issues.push(EnvIssue::warning(
            ADMIN_IDS,
            format!("invalid admin id '{chunk}' will be ignored"),
        ));
    }
    if admins.is_empty() {
        issues.push(EnvIssue::warning(
            ADMIN_IDS,
            "no admins; /ban, /unban and /banlist will be refused for everyone",
        ));
    }

    for &(key, _) in REQUEST_TIMEOUT_DEFAULTS {
        if let Some(v) = lookup(key) {
            match v.trim().parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs > 0.0 => {}
                _ => issues.push(EnvIssue::error(
                    key,
                    format!("must be a positive number of seconds, got '{v}'"),
                )),
            }
        }
    }

    issues
}

/// Whether any issue prevents the bot from running.
#[must_use]
pub fn has_errors(issues: &[EnvIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}
