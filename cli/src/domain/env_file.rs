//! `.env` file content model: pure functions over the file text.
//!
//! The file is a list of lines; assignment lines have the form `KEY=VALUE`
//! and every other line (comments, blanks) is carried through untouched.
//! Keys are unique after any mutation made here, and mutated content always
//! ends with a single trailing newline.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::EnvFileError;

// ── Known variables ──────────────────────────────────────────────────────────

pub const BOT_TOKEN: &str = "BOT_TOKEN";
pub const TARGET_CHAT: &str = "TARGET_CHAT";
pub const ADMIN_IDS: &str = "ADMIN_IDS";
pub const REQUEST_CONNECT_TIMEOUT: &str = "REQUEST_CONNECT_TIMEOUT";
pub const REQUEST_READ_TIMEOUT: &str = "REQUEST_READ_TIMEOUT";
pub const REQUEST_WRITE_TIMEOUT: &str = "REQUEST_WRITE_TIMEOUT";
pub const REQUEST_POOL_TIMEOUT: &str = "REQUEST_POOL_TIMEOUT";

/// Request timeouts read by the bot, with the defaults it falls back to.
pub const REQUEST_TIMEOUT_DEFAULTS: &[(&str, &str)] = &[
    (REQUEST_CONNECT_TIMEOUT, "10"),
    (REQUEST_READ_TIMEOUT, "25"),
    (REQUEST_WRITE_TIMEOUT, "25"),
    (REQUEST_POOL_TIMEOUT, "10"),
];

/// Tokens shorter than this are treated as placeholders.
pub const MIN_TOKEN_LEN: usize = 20;

static ENV_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex")
});

// ── Token state ──────────────────────────────────────────────────────────────

/// Classification of the `BOT_TOKEN` value stored in an env file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenState {
    /// Absent or empty.
    Unset,
    /// Present but shorter than [`MIN_TOKEN_LEN`] characters.
    Placeholder,
    /// Long enough to be started without crash-looping on an empty token.
    Valid,
}

impl TokenState {
    /// Classify a raw token value. Length is counted in characters.
    #[must_use]
    pub fn classify(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Unset,
            Some(v) if v.chars().count() < MIN_TOKEN_LEN => Self::Placeholder,
            Some(_) => Self::Valid,
        }
    }

    /// Whether the supervised service may be started with this token.
    #[must_use]
    pub fn can_start(self) -> bool {
        self == Self::Valid
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Placeholder => "placeholder",
            Self::Valid => "valid",
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a variable name.
///
/// # Errors
///
/// Returns an error if the key is not a valid shell-style variable name.
pub fn validate_key(key: &str) -> Result<(), EnvFileError> {
    if ENV_KEY_RE.is_match(key) {
        Ok(())
    } else {
        Err(EnvFileError::InvalidKey(key.to_string()))
    }
}

fn validate_pair(key: &str, value: &str) -> Result<(), EnvFileError> {
    validate_key(key)?;
    if value.contains(['\n', '\r']) {
        return Err(EnvFileError::MultilineValue(key.to_string()));
    }
    Ok(())
}

// ── Queries ──────────────────────────────────────────────────────────────────

/// Split an assignment line into `(key, value)`.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    ENV_KEY_RE
        .is_match(key)
        .then(|| (key, value.strip_suffix('\r').unwrap_or(value)))
}

/// Raw value of `key`, taken from its first assignment line.
///
/// The value is returned exactly as written after the first `=`; quotes are
/// not interpreted.
#[must_use]
pub fn get<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content
        .lines()
        .filter_map(split_assignment)
        .find_map(|(k, v)| (k == key).then_some(v))
}

/// All `(key, value)` assignments in file order.
#[must_use]
pub fn entries(content: &str) -> Vec<(&str, &str)> {
    content.lines().filter_map(split_assignment).collect()
}

/// Token state of the `BOT_TOKEN` entry in `content`.
#[must_use]
pub fn token_state(content: &str) -> TokenState {
    TokenState::classify(get(content, BOT_TOKEN))
}

// ── Mutations ────────────────────────────────────────────────────────────────

/// Set `key` to `value`, replacing the existing line in place or appending a
/// new one. Later duplicate lines for the same key are dropped.
///
/// # Errors
///
/// Returns an error if the key is invalid or the value spans several lines.
pub fn upsert(content: &str, key: &str, value: &str) -> Result<String, EnvFileError> {
    validate_pair(key, value)?;
    let assignment = format!("{key}={value}");

    let mut found = false;
    let mut lines: Vec<&str> = Vec::new();
    for line in content.lines() {
        match split_assignment(line) {
            Some((k, _)) if k == key => {
                if !found {
                    lines.push(&assignment);
                    found = true;
                }
            }
            _ => lines.push(line),
        }
    }
    if !found {
        lines.push(&assignment);
    }
    Ok(render(&lines))
}

/// Insert `key=value` only when `key` is not present yet.
///
/// Existing content is returned unchanged (apart from newline
/// normalisation) when the key already has a line, whatever its value.
///
/// # Errors
///
/// Returns an error if the key is invalid or the value spans several lines.
pub fn ensure(content: &str, key: &str, value: &str) -> Result<String, EnvFileError> {
    validate_pair(key, value)?;
    if get(content, key).is_some() {
        let lines: Vec<&str> = content.lines().collect();
        return Ok(render(&lines));
    }
    upsert(content, key, value)
}

fn render(lines: &[&str]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

// ── Unit tests ───────────────────────────────────────────────────────────────
