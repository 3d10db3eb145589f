/// Slack Web API client.
///
/// Covers the two calls the bot needs: opening a Socket Mode connection
/// (`apps.connections.open`, app-level token) and posting a message
/// (`chat.postMessage`, bot token).
use nocode_core::BotError;
use nocode_logging::redact_sensitive_data;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

const DEFAULT_API_BASE: &str = "https://slack.com/api";

// ---------------------------------------------------------------------------
// Slack wire types
// ---------------------------------------------------------------------------

#[derive(Serialize, Debug)]
pub(crate) struct PostMessageRequest<'a> {
    pub channel: &'a str,
    pub blocks: &'a [Value],
}

/// Common `{ "ok": bool, "error": "..." }` response shape.
#[derive(Deserialize, Debug)]
pub(crate) struct ApiResponse {
    ok: bool,
    error: Option<String>,
    /// Only on `apps.connections.open`.
    url: Option<String>,
}

impl ApiResponse {
    fn into_result(self, method: &str) -> Result<Self, BotError> {
        if self.ok {
            Ok(self)
        } else {
            let reason = self.error.unwrap_or_else(|| "unknown_error".into());
            Err(BotError::Transport(format!("{method} failed: {reason}")))
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SlackWebClient {
    http_client: Client,
    app_token: String,
    bot_token: String,
    api_base: String,
}

impl SlackWebClient {
    pub fn new(app_token: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            app_token: app_token.into(),
            bot_token: bot_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    /// Ask Slack for a fresh Socket Mode WebSocket URL.
    pub async fn open_connection(&self) -> Result<String, BotError> {
        let res = self
            .http_client
            .post(self.url("apps.connections.open"))
            .bearer_auth(&self.app_token)
            .send()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        let body = self.read_response("apps.connections.open", res).await?;
        body.url
            .ok_or_else(|| BotError::Transport("apps.connections.open returned no url".into()))
    }

    /// Post `blocks` as a new message in `channel`.
    pub async fn post_message(&self, channel: &str, blocks: &[Value]) -> Result<(), BotError> {
        let body = PostMessageRequest { channel, blocks };
        let res = self
            .http_client
            .post(self.url("chat.postMessage"))
            .bearer_auth(&self.bot_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        self.read_response("chat.postMessage", res).await?;
        info!(channel = %channel, blocks = blocks.len(), "[Slack] Sent message");
        Ok(())
    }

    async fn read_response(
        &self,
        method: &str,
        res: reqwest::Response,
    ) -> Result<ApiResponse, BotError> {
        let status = res.status();
        if !status.is_success() {
            let err = res.text().await.unwrap_or_default();
            error!(method = %method, status = %status, body = %redact_sensitive_data(&err), "[Slack] API call failed");
            return Err(BotError::Transport(format!("{method} returned HTTP {status}")));
        }
        let body: ApiResponse = res
            .json()
            .await
            .map_err(|e| BotError::Transport(format!("{method} returned an unreadable body: {e}")))?;
        debug!(method = %method, ok = body.ok, "[Slack] API response");
        body.into_result(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn post_message_body_shape() {
        let blocks = vec![json!({ "type": "divider" })];
        let body = PostMessageRequest { channel: "C1", blocks: &blocks };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "channel": "C1", "blocks": [{ "type": "divider" }] })
        );
    }

    #[test]
    fn api_error_is_transport_error() {
        let res: ApiResponse =
            serde_json::from_value(json!({ "ok": false, "error": "channel_not_found" })).unwrap();
        let err = res.into_result("chat.postMessage").unwrap_err();
        assert_eq!(err.to_string(), "transport error: chat.postMessage failed: channel_not_found");
    }

    #[test]
    fn connection_url_is_read() {
        let res: ApiResponse =
            serde_json::from_value(json!({ "ok": true, "url": "wss://wss.slack.com/link" })).unwrap();
        assert_eq!(res.into_result("apps.connections.open").unwrap().url.unwrap(), "wss://wss.slack.com/link");
    }

    #[test]
    fn api_base_is_normalised() {
        let client = SlackWebClient::new("xapp-1", "xoxb-1").with_api_base("http://localhost:9000/api/");
        assert_eq!(client.url("chat.postMessage"), "http://localhost:9000/api/chat.postMessage");
    }
}
