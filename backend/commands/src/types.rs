/// Slash command types.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Command definition
// ---------------------------------------------------------------------------

/// A slash command the bot answers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDef {
    /// Unique key handlers are registered under (e.g. "summary").
    pub key: String,
    pub description: String,
    /// Slash names Slack may deliver for this command (must start with '/').
    pub text_aliases: Vec<String>,
    /// Usage hint for the free-text argument, if the command takes one.
    pub arg_hint: Option<String>,
}

impl CommandDef {
    pub fn accepts_args(&self) -> bool {
        self.arg_hint.is_some()
    }
}

// ---------------------------------------------------------------------------
// Parsed invocation
// ---------------------------------------------------------------------------

/// A slash command matched against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub key: String,
    /// The slash name as Slack delivered it.
    pub raw_alias: String,
    /// Free text after the command, trimmed.
    pub raw_args: String,
}
