//! Bot configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Keys are camelCase on disk.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::defaults::{DEFAULT_DEMO_DIR, DEFAULT_LOG_LEVEL};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration of the Slack workflow bot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// App-level token used to open Socket Mode connections (`xapp-…`)
    #[serde(default)]
    pub slack_app_token: String,

    /// Bot user OAuth token used for Web API calls (`xoxb-…`)
    #[serde(default)]
    pub slack_bot_token: String,

    /// Directory holding the message templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_dir: Option<String>,

    /// Workflows reachable through `/workflow <name>`
    #[serde(default)]
    pub workflows: Vec<WorkflowConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

impl BotConfig {
    pub fn demo_dir(&self) -> &Path {
        Path::new(self.demo_dir.as_deref().unwrap_or(DEFAULT_DEMO_DIR))
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref()).map(Path::new)
    }
}

// ---------------------------------------------------------------------------
// Workflows
// ---------------------------------------------------------------------------

/// A named workflow and the template file it starts with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub file: String,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `trace` | `debug` | `info` | `warn` | `error`, or any `EnvFilter` directive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Emit JSON lines on the console instead of human-readable output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
    /// Directory for daily-rotated log files; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}
