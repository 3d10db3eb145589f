//! Config file reading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tokio::fs;

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Read a YAML config file into an untyped value tree.
///
/// Keeping it untyped lets `${VAR}` substitution run before the schema is applied.
pub async fn load_config_value(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value = parse_config_value(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    Ok(value)
}

/// Parse YAML text. An empty document is an empty mapping.
pub fn parse_config_value(raw: &str) -> Result<Value> {
    let value: Value = serde_yaml::from_str(raw)?;
    Ok(match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "slackAppToken: xapp-1\nworkflows:\n  - name: a\n    file: a.json\n").unwrap();

        let value = load_config_value(&path).await.unwrap();
        assert_eq!(value["slackAppToken"], "xapp-1");
        assert_eq!(value["workflows"][0]["file"], "a.json");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_value(&dir.path().join("nope.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn empty_document_is_empty_mapping() {
        assert_eq!(parse_config_value("").unwrap(), serde_json::json!({}));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(parse_config_value("workflows: [unclosed").is_err());
    }
}
