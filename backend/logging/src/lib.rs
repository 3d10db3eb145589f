//! Structured logging for the Slack workflow bot.
//!
//! Handles console/file output setup and token redaction for log lines.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
