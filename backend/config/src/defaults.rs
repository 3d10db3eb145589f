//! Config defaults: fills in values the file left out.

use crate::schema::{BotConfig, LoggingConfig};

/// Template directory used when `demoDir` is not set.
pub const DEFAULT_DEMO_DIR: &str = "demo";

/// Log level used when `logging.level` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: BotConfig) -> BotConfig {
    let config = apply_demo_dir_default(config);
    apply_logging_defaults(config)
}

fn apply_demo_dir_default(mut config: BotConfig) -> BotConfig {
    if config.demo_dir.as_deref().map(str::trim).unwrap_or("").is_empty() {
        config.demo_dir = Some(DEFAULT_DEMO_DIR.to_string());
    }
    config
}

fn apply_logging_defaults(mut config: BotConfig) -> BotConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(false);
    }
    config
}
