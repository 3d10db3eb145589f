//! Config redaction: produce safe-to-display config snapshots by masking tokens.

use crate::schema::BotConfig;
use serde_json::Value;

/// Keys whose string values are secrets.
static SENSITIVE_KEYS: &[&str] = &[
    "slackAppToken",
    "slackBotToken",
    "token",
    "secret",
    "password",
];

/// Number of leading characters kept as a hint (`xoxb-`, `xapp-`).
const HINT_LEN: usize = 5;

/// Serialize `config` with every token masked as `"<prefix>***"`.
pub fn redact(config: &BotConfig) -> Value {
    match serde_json::to_value(config) {
        Ok(value) => redact_value(&value),
        Err(_) => Value::Null,
    }
}

/// Mask sensitive fields anywhere in a config value tree.
pub fn redact_value(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => {
            let hint = if s.chars().count() > HINT_LEN * 2 {
                s.chars().take(HINT_LEN).collect::<String>()
            } else {
                String::new()
            };
            Value::String(format!("{hint}***"))
        }
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}
