//! Log Redaction Layer
//!
//! Scrubs Slack tokens and bearer credentials from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static SLACK_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"xox[abposr]-[A-Za-z0-9\-]+|xapp-[A-Za-z0-9\-]+").unwrap());
static BEARER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    // Bearer first so the whole header collapses into one marker
    let redacted = BEARER_RE.replace_all(input, "[REDACTED_TOKEN]");
    SLACK_TOKEN_RE.replace_all(&redacted, "[REDACTED_TOKEN]").to_string()
}
