/// Slack Socket Mode transport.
///
/// Opens a WebSocket with an app-level token, turns each frame into an
/// [`InboundEvent`], and writes acknowledgments back over the same socket.
/// Reconnects on its own; the dispatcher only ever sees lifecycle events.
///
/// Required tokens:
///   app token: App-Level Token with `connections:write` (xapp-...)
///   bot token: Bot User OAuth Token (xoxb-...)
use std::sync::Arc;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use nocode_core::{AckPayload, BotError, InboundEvent, RequestHandle, Transport};
use serde_json::Value;
use tokio::sync::{RwLock, mpsc};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::reconnect::ReconnectPolicy;
use crate::slack_api::SlackWebClient;
use crate::slack_events::{SocketAck, SocketMessage, parse_socket_message};

/// Default buffer between the socket reader and the dispatcher.
const DEFAULT_EVENT_BUFFER: usize = 256;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SocketModeConfig {
    pub app_token: String,
    pub bot_token: String,
    pub event_buffer: usize,
    pub reconnect: ReconnectPolicy,
}

impl SocketModeConfig {
    pub fn new(app_token: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            app_token: app_token.into(),
            bot_token: bot_token.into(),
            event_buffer: DEFAULT_EVENT_BUFFER,
            reconnect: ReconnectPolicy::default(),
        }
    }
}

/// How one connection ended.
enum ConnectionEnd {
    /// Shutdown was requested.
    Cancelled,
    /// The dispatcher dropped its receiver.
    ReceiverGone,
    /// Slack asked us to reconnect.
    Refresh,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct SocketModeClient {
    config: SocketModeConfig,
    web: SlackWebClient,
    /// Writer for the live connection, if any.
    outbound: RwLock<Option<mpsc::UnboundedSender<WsMessage>>>,
}

impl SocketModeClient {
    pub fn new(config: SocketModeConfig) -> Self {
        let web = SlackWebClient::new(config.app_token.clone(), config.bot_token.clone());
        Self::with_web_client(config, web)
    }

    pub fn with_web_client(config: SocketModeConfig, web: SlackWebClient) -> Self {
        Self { config, web, outbound: RwLock::new(None) }
    }

    /// Spawn the connection loop and return the inbound event stream.
    ///
    /// The stream ends when `cancel` fires or the loop gives up.
    pub fn start(self: &Arc<Self>, cancel: CancellationToken) -> mpsc::Receiver<InboundEvent> {
        let (tx, rx) = mpsc::channel(self.config.event_buffer);
        let client = Arc::clone(self);
        tokio::spawn(async move {
            client.connection_loop(tx, cancel).await;
        });
        rx
    }

    async fn connection_loop(&self, events: mpsc::Sender<InboundEvent>, cancel: CancellationToken) {
        let mut attempt: u32 = 0;
        loop {
            if cancel.is_cancelled() || events.send(InboundEvent::Connecting).await.is_err() {
                break;
            }

            let outcome = tokio::select! {
                _ = cancel.cancelled() => Ok(ConnectionEnd::Cancelled),
                outcome = self.run_connection(&events, &cancel, &mut attempt) => outcome,
            };
            match outcome {
                Ok(ConnectionEnd::Cancelled) | Ok(ConnectionEnd::ReceiverGone) => break,
                Ok(ConnectionEnd::Refresh) => {
                    info!("[Slack] Refreshing Socket Mode connection");
                }
                Err(e) => {
                    attempt = attempt.saturating_add(1);
                    let delay = self.config.reconnect.delay_for(attempt);
                    warn!(error = %e, attempt, delay_ms = delay.as_millis() as u64, "[Slack] Socket Mode connection failed");
                    if events
                        .send(InboundEvent::ConnectionError { reason: e.to_string() })
                        .await
                        .is_err()
                    {
                        break;
                    }
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
        *self.outbound.write().await = None;
        info!("[Slack] Socket Mode loop stopped");
    }

    async fn run_connection(
        &self,
        events: &mpsc::Sender<InboundEvent>,
        cancel: &CancellationToken,
        attempt: &mut u32,
    ) -> Result<ConnectionEnd, BotError> {
        let url = self.web.open_connection().await?;
        let (socket, _) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| BotError::Transport(format!("websocket connect failed: {e}")))?;
        debug!("[Slack] WebSocket established");

        let (mut sink, mut stream) = socket.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<WsMessage>();
        *self.outbound.write().await = Some(out_tx.clone());

        let writer = tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                if let Err(e) = sink.send(msg).await {
                    error!(error = %e, "[Slack] WebSocket write failed");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let end = loop {
            let frame = tokio::select! {
                _ = cancel.cancelled() => break Ok(ConnectionEnd::Cancelled),
                frame = stream.next() => frame,
            };
            let frame = match frame {
                Some(Ok(frame)) => frame,
                Some(Err(e)) => break Err(BotError::Transport(format!("websocket read failed: {e}"))),
                None => break Err(BotError::Transport("websocket closed".into())),
            };

            match frame {
                WsMessage::Text(text) => match parse_socket_message(text.as_str()) {
                    Ok(SocketMessage::Hello) => {
                        *attempt = 0;
                        if events.send(InboundEvent::Connected).await.is_err() {
                            break Ok(ConnectionEnd::ReceiverGone);
                        }
                    }
                    Ok(SocketMessage::Disconnect { reason }) => {
                        info!(reason = %reason, "[Slack] Server requested disconnect");
                        break Ok(ConnectionEnd::Refresh);
                    }
                    Ok(SocketMessage::Event(event)) => {
                        if events.send(event).await.is_err() {
                            break Ok(ConnectionEnd::ReceiverGone);
                        }
                    }
                    Err(e) => warn!(error = %e, "[Slack] Unparseable Socket Mode frame"),
                },
                WsMessage::Ping(data) => {
                    let _ = out_tx.send(WsMessage::Pong(data));
                }
                WsMessage::Close(frame) => {
                    let reason = frame.map(|f| f.reason.as_str().to_string()).unwrap_or_default();
                    break Err(BotError::Transport(format!("websocket closed by server: {reason}")));
                }
                _ => {}
            }
        };

        // Dropping every sender lets the writer flush and close the socket.
        *self.outbound.write().await = None;
        drop(out_tx);
        let _ = writer.await;
        end
    }
}

#[async_trait]
impl Transport for SocketModeClient {
    async fn ack(&self, request: &RequestHandle, payload: AckPayload) -> Result<(), BotError> {
        let frame = serde_json::to_string(&SocketAck {
            envelope_id: request.envelope_id(),
            payload: payload.as_raw(),
        })?;

        let guard = self.outbound.read().await;
        let Some(sender) = guard.as_ref() else {
            return Err(BotError::ChannelClosed("no live Socket Mode connection".into()));
        };
        sender
            .send(WsMessage::Text(frame.into()))
            .map_err(|_| BotError::ChannelClosed("Socket Mode writer stopped".into()))?;
        debug!(envelope = %request, "[Slack] Acknowledged envelope");
        Ok(())
    }

    async fn post_message(&self, channel: &str, blocks: &[Value]) -> Result<(), BotError> {
        self.web.post_message(channel, blocks).await
    }
}
