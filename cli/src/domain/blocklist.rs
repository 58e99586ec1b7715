//! Read-only view of the blocklist the bot keeps next to its code.
//!
//! The bot owns `blocked_users.json` and rewrites it on every `/ban` and
//! `/unban`; the deployer only counts entries for status output.

/// Parse the blocklist leniently: anything other than a JSON array yields an
/// empty list and entries that are not integers are skipped.
#[must_use]
pub fn parse(content: &str) -> Vec<i64> {
    let Ok(serde_json::Value::Array(items)) = serde_json::from_str(content) else {
        return Vec::new();
    };
    let mut ids: Vec<i64> = items
        .iter()
        .filter_map(|item| match item {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
