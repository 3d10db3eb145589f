/// Command dispatch: route detected commands to handler functions.
use anyhow::Result;
use async_trait::async_trait;
use nocode_core::AckPayload;
use tracing::{info, warn};

use crate::types::CommandInvocation;

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// Who invoked a command, and where.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub user_id: String,
    pub user_name: String,
    pub channel_id: String,
}

/// What a handler wants sent back for the invocation.
#[derive(Debug, Clone)]
pub enum CommandOutcome {
    /// Acknowledge with this payload.
    Reply(AckPayload),
    /// Leave the invocation unacknowledged.
    NoReply,
}

impl CommandOutcome {
    /// Reply with a single markdown section.
    pub fn text(text: impl AsRef<str>) -> Result<Self> {
        Ok(Self::Reply(AckPayload::text(text.as_ref())?))
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandOutcome>;
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

use std::collections::HashMap;
use std::sync::Arc;

pub struct CommandDispatcher {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self { handlers: HashMap::new() }
    }

    pub fn register(&mut self, key: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(key.into(), handler);
    }

    pub fn has_handler(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    pub async fn dispatch(
        &self,
        ctx: &CommandContext,
        inv: &CommandInvocation,
    ) -> Result<CommandOutcome> {
        if let Some(handler) = self.handlers.get(&inv.key) {
            info!(command = %inv.raw_alias, user = %ctx.user_name, channel = %ctx.channel_id, "[Commands] Dispatching");
            handler.handle(ctx, inv).await
        } else {
            warn!(command = %inv.key, "[Commands] No handler registered; ignoring");
            Ok(CommandOutcome::NoReply)
        }
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl CommandHandler for Echo {
        async fn handle(&self, _ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandOutcome> {
            CommandOutcome::text(&inv.raw_args)
        }
    }

    fn invocation(key: &str, args: &str) -> CommandInvocation {
        CommandInvocation { key: key.into(), raw_alias: format!("/{key}"), raw_args: args.into() }
    }

    #[tokio::test]
    async fn routes_to_registered_handler() {
        let mut dispatcher = CommandDispatcher::new();
        dispatcher.register("echo", Arc::new(Echo));

        let outcome = dispatcher
            .dispatch(&CommandContext::default(), &invocation("echo", "hello"))
            .await
            .unwrap();
        let CommandOutcome::Reply(payload) = outcome else { panic!("expected a reply") };
        assert_eq!(payload.to_value().unwrap()["blocks"][0]["text"]["text"], "hello");
    }

    #[tokio::test]
    async fn unregistered_key_gets_no_reply() {
        let dispatcher = CommandDispatcher::new();
        let outcome = dispatcher
            .dispatch(&CommandContext::default(), &invocation("missing", ""))
            .await
            .unwrap();
        assert!(matches!(outcome, CommandOutcome::NoReply));
    }
}
