// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Structured logging and detail redaction.
//!
//! Log lines are structured (`tracing`) and, in production, JSON-formatted:
//! `timestamp`, `level`, `event`, `message`, `correlation_id`, `user_id`,
//! `route`, `details`. Free-form `details` payloads pass through
//! [`redact_details`] before emission so credential material never reaches
//! the log stream, no matter which caller assembled the payload.

use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Replacement for values under a sensitive key.
pub const REDACTED: &str = "[REDACTED]";

/// Replacement for structure below the depth limit.
pub const TRUNCATED: &str = "[TRUNCATED]";

/// Nesting depth beyond which payload structure is cut off.
const MAX_DEPTH: usize = 4;

/// Key fragments that mark a value as sensitive, matched case-insensitively
/// against each key's lowercase form.
const SENSITIVE_KEY_MARKERS: &[&str] = &[
    "password",
    "token",
    "secret",
    "authorization",
    "cookie",
    "signature",
    "jwt",
    "iban",
    "account_number",
    "accountnumber",
    "api_key",
    "apikey",
    "private_key",
];

/// Install the global tracing subscriber.
///
/// `RUST_LOG` controls filtering (default `info`); the format follows the
/// resolved configuration.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Redact a structured `details` payload.
///
/// Any object key whose lowercase form contains a sensitive marker has its
/// value replaced with [`REDACTED`], at any depth up to [`MAX_DEPTH`];
/// structure below the limit is replaced with [`TRUNCATED`]. Non-sensitive
/// keys and scalar values pass through unchanged.
pub fn redact_details(details: &Value) -> Value {
    redact_at_depth(details, 0)
}

fn redact_at_depth(value: &Value, depth: usize) -> Value {
    if depth >= MAX_DEPTH {
        return match value {
            Value::Object(_) | Value::Array(_) => Value::String(TRUNCATED.to_string()),
            other => other.clone(),
        };
    }

    match value {
        Value::Object(map) => {
            let redacted = map
                .iter()
                .map(|(key, val)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String(REDACTED.to_string()))
                    } else {
                        (key.clone(), redact_at_depth(val, depth + 1))
                    }
                })
                .collect();
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| redact_at_depth(item, depth + 1))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_KEY_MARKERS
        .iter()
        .any(|marker| key.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn top_level_password_is_redacted() {
        let details = json!({"password": "hunter2", "name": "Alice"});
        let redacted = redact_details(&details);
        assert_eq!(redacted["password"], REDACTED);
        assert_eq!(redacted["name"], "Alice");
    }

    #[test]
    fn nested_sensitive_keys_are_redacted() {
        let details = json!({
            "request": {
                "headers": {
                    "Authorization": "Bearer abc",
                    "x-correlation-id": "cid-1"
                }
            }
        });
        let redacted = redact_details(&details);
        assert_eq!(redacted["request"]["headers"]["Authorization"], REDACTED);
        assert_eq!(redacted["request"]["headers"]["x-correlation-id"], "cid-1");
    }

    #[test]
    fn marker_matching_is_case_insensitive_and_substring() {
        let details = json!({
            "UserPassword": "x",
            "refreshToken": "x",
            "sessionCookie": "x",
            "ibanNumber": "x",
            "details": "kept"
        });
        let redacted = redact_details(&details);
        for key in ["UserPassword", "refreshToken", "sessionCookie", "ibanNumber"] {
            assert_eq!(redacted[key], REDACTED, "key {key}");
        }
        assert_eq!(redacted["details"], "kept");
    }

    #[test]
    fn depth_four_is_redacted_deeper_is_truncated() {
        // password sits at depth 4 (four keys down), its sibling object at
        // depth 4 holds structure that crosses the limit.
        let details = json!({
            "a": {"b": {"c": {"password": "deep", "d": {"e": "too deep"}}}}
        });
        let redacted = redact_details(&details);
        assert_eq!(redacted["a"]["b"]["c"]["password"], REDACTED);
        assert_eq!(redacted["a"]["b"]["c"]["d"], TRUNCATED);
    }

    #[test]
    fn arrays_are_walked() {
        let details = json!({"events": [{"token": "t1"}, {"kind": "ok"}]});
        let redacted = redact_details(&details);
        assert_eq!(redacted["events"][0]["token"], REDACTED);
        assert_eq!(redacted["events"][1]["kind"], "ok");
    }

    #[test]
    fn scalars_pass_through() {
        let details = json!({"count": 3, "flag": true, "note": null});
        assert_eq!(redact_details(&details), details);
    }
}
