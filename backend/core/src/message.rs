use serde::Serialize;
use serde_json::value::{to_raw_value, RawValue};
use serde_json::Value;

use crate::blocks::simple_payload;
use crate::error::BotError;
use crate::types::Template;

/// Body sent back with an acknowledgment.
///
/// Stored as raw JSON so a template can be replayed byte-for-byte.
/// An empty payload acknowledges without a body.
#[derive(Debug, Clone, Default)]
pub struct AckPayload(Option<Box<RawValue>>);

impl AckPayload {
    pub fn empty() -> Self {
        Self(None)
    }

    /// Encode any serializable value as the payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, BotError> {
        Ok(Self(Some(to_raw_value(value)?)))
    }

    /// A single markdown section carrying `text`.
    pub fn text(text: &str) -> Result<Self, BotError> {
        Self::json(&simple_payload(text))
    }

    /// The template's payload, verbatim.
    pub fn template(template: &Template) -> Self {
        Self(Some(template.raw().to_owned()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_raw(&self) -> Option<&RawValue> {
        self.0.as_deref()
    }

    /// Parsed view of the payload.
    pub fn to_value(&self) -> Option<Value> {
        self.0
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw.get()).ok())
    }
}
