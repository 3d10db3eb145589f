//! Config validation with user-friendly error messages.

use crate::schema::BotConfig;
use std::collections::HashSet;
use thiserror::Error;

const APP_TOKEN_PREFIX: &str = "xapp-";
const BOT_TOKEN_PREFIX: &str = "xoxb-";

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &BotConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_tokens(config, &mut report);
    validate_workflows(config, &mut report);
    report
}

fn validate_tokens(config: &BotConfig, report: &mut ValidationReport) {
    check_token(&config.slack_app_token, "slackAppToken", APP_TOKEN_PREFIX, report);
    check_token(&config.slack_bot_token, "slackBotToken", BOT_TOKEN_PREFIX, report);
}

fn check_token(token: &str, path: &str, prefix: &str, report: &mut ValidationReport) {
    if token.trim().is_empty() {
        report.error(path, "Token is required");
    } else if !token.starts_with(prefix) {
        report.error(path, format!("Token must have the prefix \"{prefix}\""));
    }
}

/// Every workflow needs a name and a file; repeated names are allowed but
/// only the last one is reachable.
fn validate_workflows(config: &BotConfig, report: &mut ValidationReport) {
    if config.workflows.is_empty() {
        report.warn("workflows", "No workflows configured; /workflow will never find anything");
    }

    let mut seen = HashSet::new();
    for (i, wf) in config.workflows.iter().enumerate() {
        let path = format!("workflows[{i}]");
        if wf.name.trim().is_empty() {
            report.error(format!("{path}.name"), "Workflow name cannot be empty");
        }
        if wf.file.trim().is_empty() {
            report.error(format!("{path}.file"), "Workflow file cannot be empty");
        }
        if !wf.name.is_empty() && !seen.insert(wf.name.as_str()) {
            report.warn(
                format!("{path}.name"),
                format!("Workflow '{}' is defined more than once; the last definition wins", wf.name),
            );
        }
    }
}
