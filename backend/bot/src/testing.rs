//! Recording transport used by the dispatcher and interaction tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use nocode_core::{AckPayload, BotError, RequestHandle, Transport};
use serde_json::Value;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct RecordedAck {
    pub request: RequestHandle,
    pub payload: AckPayload,
}

impl RecordedAck {
    /// First section's text, for textual replies.
    pub fn text(&self) -> Option<String> {
        self.payload
            .to_value()
            .and_then(|v| v["blocks"][0]["text"]["text"].as_str().map(String::from))
    }
}

#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub channel: String,
    pub blocks: Vec<Value>,
}

#[derive(Default)]
pub struct RecordingTransport {
    acks: Mutex<Vec<RecordedAck>>,
    posts: Mutex<Vec<RecordedPost>>,
    fail_posts: AtomicBool,
    stall_posts: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_posts() -> Self {
        let transport = Self::default();
        transport.fail_posts.store(true, Ordering::SeqCst);
        transport
    }

    /// `post_message` records the call and then never returns.
    pub fn stalled_posts() -> Self {
        let transport = Self::default();
        transport.stall_posts.store(true, Ordering::SeqCst);
        transport
    }

    pub async fn acks(&self) -> Vec<RecordedAck> {
        self.acks.lock().await.clone()
    }

    pub async fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().await.clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn ack(&self, request: &RequestHandle, payload: AckPayload) -> Result<(), BotError> {
        self.acks.lock().await.push(RecordedAck { request: request.clone(), payload });
        Ok(())
    }

    async fn post_message(&self, channel: &str, blocks: &[Value]) -> Result<(), BotError> {
        self.posts.lock().await.push(RecordedPost {
            channel: channel.to_string(),
            blocks: blocks.to_vec(),
        });
        if self.stall_posts.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_posts.load(Ordering::SeqCst) {
            return Err(BotError::Transport("channel_not_found".into()));
        }
        Ok(())
    }
}
