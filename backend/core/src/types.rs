use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::error::BotError;

/// A named, immutable message payload loaded from the template directory.
///
/// The original JSON text is kept verbatim so it can be replayed as an
/// acknowledgment body without re-encoding; `blocks` is the parsed Block Kit
/// array used when the template is posted as a fresh message.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    raw: Box<RawValue>,
    blocks: Vec<Value>,
}

#[derive(Deserialize)]
struct TemplateBody {
    #[serde(default)]
    blocks: Vec<Value>,
}

impl Template {
    /// Parse a template from its source text. The payload must be a JSON
    /// object; a `blocks` field, when present, must be an array.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, BotError> {
        let name = name.into();
        let raw: Box<RawValue> = serde_json::from_str(source).map_err(|source| {
            BotError::TemplateParse { name: name.clone(), source }
        })?;
        let object: Map<String, Value> = serde_json::from_str(raw.get()).map_err(|source| {
            BotError::TemplateParse { name: name.clone(), source }
        })?;
        let body: TemplateBody = serde_json::from_value(Value::Object(object)).map_err(
            |source| BotError::TemplateParse { name: name.clone(), source },
        )?;

        Ok(Self { name, raw, blocks: body.blocks })
    }

    /// Filename the template was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The payload exactly as it appeared on disk (without surrounding whitespace).
    pub fn source(&self) -> &str {
        self.raw.get()
    }

    pub fn raw(&self) -> &RawValue {
        &self.raw
    }

    /// Renderable Block Kit blocks.
    pub fn blocks(&self) -> &[Value] {
        &self.blocks
    }
}

/// A user-facing workflow name pointing at a template filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    pub file: String,
}

impl WorkflowDefinition {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self { name: name.into(), file: file.into() }
    }
}

/// One finished interactive action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub user: String,
    pub timestamp: DateTime<Utc>,
    pub selected_value: String,
    /// Identifier of the action that produced this record. Not rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_message: Option<String>,
}

impl CompletionRecord {
    pub fn new(user: impl Into<String>, selected_value: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            timestamp: Utc::now(),
            selected_value: selected_value.into(),
            source_message: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_source_message(mut self, source: impl Into<String>) -> Self {
        self.source_message = Some(source.into());
        self
    }

    /// `"<user> | <RFC 3339 timestamp> | selected <value>"`
    pub fn summary_line(&self) -> String {
        format!(
            "{} | {} | selected {}",
            self.user,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.selected_value
        )
    }
}
