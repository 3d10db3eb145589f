use async_trait::async_trait;
use serde_json::Value;

use crate::error::BotError;
use crate::event::RequestHandle;
use crate::message::AckPayload;

/// The connection the bot talks through.
///
/// Inbound events arrive on a channel owned by the implementation; this
/// trait covers the two calls the bot makes back into it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Resolve an inbound event. Must be called exactly once per event that
    /// carries a [`RequestHandle`].
    async fn ack(&self, request: &RequestHandle, payload: AckPayload) -> Result<(), BotError>;

    /// Post a new message with the given blocks to a channel.
    async fn post_message(&self, channel: &str, blocks: &[Value]) -> Result<(), BotError>;
}
