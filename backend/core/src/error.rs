use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the bot runtime.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("failed to read template {path}: {source}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template {name} is not a valid message payload: {source}")]
    TemplateParse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("payload encoding error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("channel closed: {0}")]
    ChannelClosed(String),
}
