//! Slack Socket Mode envelopes
//!
//! Parses frames received over the Socket Mode WebSocket into bot events.

use nocode_core::{BotError, InboundEvent, InteractionCallback, RequestHandle, SlashCommand};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Frame envelope as sent by Slack.
#[derive(Deserialize, Debug)]
struct SocketEnvelope {
    #[serde(rename = "type")]
    envelope_type: String,
    /// Present on every frame that must be acknowledged.
    envelope_id: Option<String>,
    payload: Option<Value>,
    /// Present on `disconnect` frames (e.g. "refresh_requested", "warning").
    reason: Option<String>,
}

/// Acknowledgment frame written back to Slack.
#[derive(Serialize, Debug)]
pub(crate) struct SocketAck<'a> {
    pub envelope_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<&'a serde_json::value::RawValue>,
}

/// What a single frame means to the connection loop.
#[derive(Debug)]
pub enum SocketMessage {
    /// Slack finished the handshake.
    Hello,
    /// Slack wants this connection dropped and a new one opened.
    Disconnect { reason: String },
    /// An event for the dispatcher.
    Event(InboundEvent),
}

/// Parse one text frame.
pub fn parse_socket_message(text: &str) -> Result<SocketMessage, BotError> {
    let envelope: SocketEnvelope = serde_json::from_str(text)?;
    let request = envelope.envelope_id.map(RequestHandle::new);

    let event = match (envelope.envelope_type.as_str(), request) {
        ("hello", _) => return Ok(SocketMessage::Hello),
        ("disconnect", _) => {
            return Ok(SocketMessage::Disconnect {
                reason: envelope.reason.unwrap_or_else(|| "unspecified".into()),
            });
        }
        ("events_api", Some(request)) => InboundEvent::EventsApi {
            request,
            payload: envelope.payload.unwrap_or(Value::Null),
        },
        ("slash_commands", Some(request)) => {
            match envelope.payload.map(serde_json::from_value::<SlashCommand>) {
                Some(Ok(command)) => InboundEvent::SlashCommand { request, command },
                other => {
                    warn!(envelope = %request, error = ?other.and_then(Result::err), "[Slack] Malformed slash command payload");
                    InboundEvent::Unknown { kind: "slash_commands".into(), request: Some(request) }
                }
            }
        }
        ("interactive", Some(request)) => {
            match envelope.payload.map(serde_json::from_value::<InteractionCallback>) {
                Some(Ok(callback)) => InboundEvent::Interactive { request, callback },
                other => {
                    warn!(envelope = %request, error = ?other.and_then(Result::err), "[Slack] Malformed interaction payload");
                    InboundEvent::Unknown { kind: "interactive".into(), request: Some(request) }
                }
            }
        }
        (kind, request) => InboundEvent::Unknown { kind: kind.to_string(), request },
    };

    Ok(SocketMessage::Event(event))
}
