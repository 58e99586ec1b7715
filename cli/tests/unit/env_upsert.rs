//! Property-based tests for the `.env` upsert invariants.
//!
//! Uses `proptest` to verify idempotence, in-place replacement and key
//! uniqueness across many random files.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use avtofix_deploy::domain::env_file::{ensure, entries, get, upsert};

fn key() -> impl Strategy<Value = String> {
    "[A-Z_][A-Z0-9_]{0,8}"
}

fn value() -> impl Strategy<Value = String> {
    "[ -~]{0,24}"
}

/// A file of unique assignments interleaved with comments and blanks.
fn env_file() -> impl Strategy<Value = String> {
    prop::collection::btree_map(key(), value(), 0..8).prop_flat_map(|vars| {
        let n = vars.len();
        (Just(vars), prop::collection::vec(any::<bool>(), n)).prop_map(|(vars, comments)| {
            let mut out = String::new();
            for ((k, v), comment) in vars.iter().zip(comments) {
                if comment {
                    out.push_str("# note\n\n");
                }
                out.push_str(&format!("{k}={v}\n"));
            }
            out
        })
    })
}

proptest! {
    /// Upserting the same pair twice yields byte-identical output.
    #[test]
    fn prop_upsert_is_idempotent(content in env_file(), k in key(), v in value()) {
        let once = upsert(&content, &k, &v).expect("valid pair");
        let twice = upsert(&once, &k, &v).expect("valid pair");
        prop_assert_eq!(once, twice);
    }

    /// After an upsert the key appears exactly once, with the new value.
    #[test]
    fn prop_upsert_leaves_single_assignment(content in env_file(), k in key(), v in value()) {
        let out = upsert(&content, &k, &v).expect("valid pair");
        let matches = entries(&out).into_iter().filter(|(ek, _)| *ek == k).count();
        prop_assert_eq!(matches, 1);
        prop_assert_eq!(get(&out, &k), Some(v.as_str()));
    }

    /// Replacing an existing key never reorders the other lines.
    #[test]
    fn prop_upsert_keeps_other_lines_in_order(content in env_file(), v in value()) {
        let Some((k, _)) = entries(&content).first().map(|(k, v)| (k.to_string(), v.to_string())) else {
            return Ok(());
        };
        let out = upsert(&content, &k, &v).expect("valid pair");
        let others = |s: &str| -> Vec<String> {
            s.lines()
                .filter(|l| !l.starts_with(&format!("{k}=")))
                .map(str::to_string)
                .collect()
        };
        prop_assert_eq!(others(&content), others(&out));
        prop_assert_eq!(content.lines().count(), out.lines().count());
    }

    /// A new key is appended after everything that was there.
    #[test]
    fn prop_upsert_appends_new_key(content in env_file(), v in value()) {
        let out = upsert(&content, "ZZ_NEW_KEY", &v).expect("valid pair");
        prop_assert!(out.starts_with(&content));
        let expected_tail = format!("ZZ_NEW_KEY={v}\n");
        prop_assert!(out.ends_with(&expected_tail));
    }

    /// `ensure` never changes the value of a key that is already present.
    #[test]
    fn prop_ensure_never_overwrites(content in env_file(), v in value()) {
        for (k, existing) in entries(&content) {
            let out = ensure(&content, k, &v).expect("valid pair");
            prop_assert_eq!(get(&out, k), Some(existing));
            prop_assert_eq!(&out, &content);
        }
    }
}

#[test]
fn test_upsert_rejects_multiline_value() {
    assert!(upsert("", "BOT_TOKEN", "a\nb").is_err());
}

#[test]
fn test_upsert_rejects_invalid_key() {
    assert!(upsert("", "1BAD", "x").is_err());
    assert!(upsert("", "BAD-KEY", "x").is_err());
}
