//! `nocode-config`: configuration for the Slack workflow bot.
//!
//! Provides:
//! - Typed config schema (tokens, template directory, workflows, logging)
//! - YAML loading
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with errors and warnings
//! - Redaction for safe logging/display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use schema::{BotConfig, LoggingConfig, WorkflowConfig};
pub use io::{load_config_value, parse_config_value, DEFAULT_CONFIG_FILE};
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use redact::{redact, redact_value};
pub use defaults::apply_all_defaults;
pub use validation::{validate, ValidationReport, ConfigValidationError};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// A validated config plus the warnings found while checking it.
///
/// Config loading runs before the logger exists, so warnings are handed to
/// the caller to log once logging is up.
#[derive(Debug)]
pub struct PreparedConfig {
    pub config: BotConfig,
    pub warnings: Vec<ConfigValidationError>,
}

/// Load, apply env substitution, apply defaults, and validate a config file.
///
/// This is the main entry point for loading a config at runtime. Any
/// validation error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<PreparedConfig> {
    let value = load_config_value(path).await?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    finish(value)
}

/// [`load_and_prepare`] for an already parsed value and an explicit environment.
pub fn prepare(value: Value, env: &HashMap<String, String>) -> Result<PreparedConfig> {
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;
    finish(value)
}

fn finish(value: Value) -> Result<PreparedConfig> {
    let config: BotConfig =
        serde_json::from_value(value).context("Config does not match the expected schema")?;

    let config = apply_all_defaults(config);

    let report = validate(&config);
    if !report.is_valid() {
        let summary: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("Invalid config: {}", summary.join("; "));
    }

    Ok(PreparedConfig { config, warnings: report.warnings })
}
