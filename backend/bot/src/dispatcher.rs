use std::sync::Arc;

use anyhow::Result;
use nocode_commands::{
    build_default_dispatcher, detect_command, CommandContext, CommandDispatcher, CommandOutcome,
    CommandRegistry,
};
use nocode_core::{AckPayload, InboundEvent, RequestHandle, SlashCommand, Transport};
use nocode_workflows::{CompletionLedger, TemplateStore, WorkflowRegistry};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::interactions::InteractionHandler;

/// Connection phase as last reported by the transport. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Consumes the transport's event stream one event at a time and routes each
/// event to its handler.
pub struct EventDispatcher {
    transport: Arc<dyn Transport>,
    registry: CommandRegistry,
    commands: CommandDispatcher,
    interactions: InteractionHandler,
    state: ConnectionState,
}

impl EventDispatcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        templates: Arc<TemplateStore>,
        workflows: Arc<WorkflowRegistry>,
        ledger: CompletionLedger,
    ) -> Self {
        let commands = build_default_dispatcher(ledger.clone(), workflows, templates.clone());
        let interactions = InteractionHandler::new(ledger, templates, transport.clone());
        Self {
            transport,
            registry: CommandRegistry::new(),
            commands,
            interactions,
            state: ConnectionState::default(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Run until the event stream closes or `cancel` fires. Cancellation also
    /// interrupts an event that is still being handled.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<InboundEvent>,
        cancel: CancellationToken,
    ) -> Result<()> {
        info!("Event dispatcher started");

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Event dispatcher cancelled");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => event,
                    None => {
                        info!("Event stream closed; dispatcher stopping");
                        break;
                    }
                },
            };

            let kind = event.kind().to_string();
            tokio::select! {
                _ = cancel.cancelled() => {
                    warn!(kind = %kind, "Shutdown interrupted an in-flight event");
                    break;
                }
                _ = self.handle_event(event) => {}
            }
        }

        Ok(())
    }

    /// Handle a single event. Per-event failures are logged and never escape.
    pub async fn handle_event(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::Connecting => {
                self.state = ConnectionState::Connecting;
                info!("Connecting to Slack with Socket Mode...");
            }
            InboundEvent::ConnectionError { reason } => {
                self.state = ConnectionState::Disconnected;
                warn!(reason = %reason, "Connection failed. Retrying later...");
            }
            InboundEvent::Connected => {
                self.state = ConnectionState::Connected;
                info!("Connected to Slack with Socket Mode.");
            }
            InboundEvent::EventsApi { request, payload } => {
                let event_type = payload
                    .pointer("/event/type")
                    .or_else(|| payload.get("type"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown");
                debug!(envelope = %request, event_type = %event_type, "Event received");
                self.ack(&request, AckPayload::empty()).await;
            }
            InboundEvent::SlashCommand { request, command } => {
                self.handle_command(&request, command).await;
            }
            InboundEvent::Interactive { request, callback } => {
                if let Err(e) = self.interactions.handle(&request, callback).await {
                    error!(envelope = %request, error = %e, "Interaction handling failed");
                }
            }
            InboundEvent::Unknown { kind, .. } => {
                warn!(kind = %kind, "Unexpected event type received");
            }
        }
    }

    async fn handle_command(&self, request: &RequestHandle, command: SlashCommand) {
        let Some(invocation) = detect_command(&command, &self.registry) else {
            debug!(command = %command.command, "Ignoring unrecognized command");
            return;
        };

        let ctx = CommandContext {
            user_id: command.user_id,
            user_name: command.user_name,
            channel_id: command.channel_id,
        };
        match self.commands.dispatch(&ctx, &invocation).await {
            Ok(CommandOutcome::Reply(payload)) => self.ack(request, payload).await,
            Ok(CommandOutcome::NoReply) => {}
            Err(e) => error!(command = %invocation.raw_alias, error = %e, "Command handler failed"),
        }
    }

    async fn ack(&self, request: &RequestHandle, payload: AckPayload) {
        if let Err(e) = self.transport.ack(request, payload).await {
            error!(envelope = %request, error = %e, "Failed to acknowledge event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use chrono::{TimeZone, Utc};
    use nocode_core::{
        BlockAction, CompletionRecord, InteractionCallback, Template, WorkflowDefinition,
    };
    use serde_json::json;
    use std::time::Duration;

    struct Harness {
        transport: Arc<RecordingTransport>,
        ledger: CompletionLedger,
        dispatcher: EventDispatcher,
    }

    fn harness(workflows: Vec<WorkflowDefinition>, templates: Vec<Template>) -> Harness {
        harness_on(Arc::new(RecordingTransport::new()), workflows, templates)
    }

    fn harness_on(
        transport: Arc<RecordingTransport>,
        workflows: Vec<WorkflowDefinition>,
        templates: Vec<Template>,
    ) -> Harness {
        let ledger = CompletionLedger::new();
        let dispatcher = EventDispatcher::new(
            transport.clone(),
            Arc::new(TemplateStore::from_templates(templates)),
            Arc::new(WorkflowRegistry::build(workflows)),
            ledger.clone(),
        );
        Harness { transport, ledger, dispatcher }
    }

    fn slash(id: &str, command: &str, text: &str) -> InboundEvent {
        InboundEvent::SlashCommand {
            request: RequestHandle::new(id),
            command: SlashCommand {
                command: command.into(),
                text: text.into(),
                user_id: "U1".into(),
                user_name: "alice".into(),
                channel_id: "C1".into(),
            },
        }
    }

    fn click(id: &str, action_id: &str, value: &str) -> InboundEvent {
        InboundEvent::Interactive {
            request: RequestHandle::new(id),
            callback: InteractionCallback::block_actions(
                "alice",
                "C1",
                vec![BlockAction::new(action_id, value)],
            ),
        }
    }

    #[tokio::test]
    async fn summary_of_empty_ledger_acks_zero_lines() {
        let mut h = harness(vec![], vec![]);
        h.dispatcher.handle_event(slash("e1", "/summary", "")).await;

        let acks = h.transport.acks().await;
        assert_eq!(acks.len(), 1);
        assert_eq!(acks[0].request, RequestHandle::new("e1"));
        assert_eq!(acks[0].payload.to_value().unwrap(), json!({ "blocks": [] }));
    }

    #[tokio::test]
    async fn summary_lists_recorded_completion() {
        let mut h = harness(vec![], vec![]);
        let t = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        h.ledger.append(CompletionRecord::new("alice", "optionA").with_timestamp(t)).await;

        h.dispatcher.handle_event(slash("e1", "/summary", "")).await;

        let acks = h.transport.acks().await;
        assert_eq!(acks[0].text().unwrap(), "alice | 2025-01-02T03:04:05Z | selected optionA");
    }

    #[tokio::test]
    async fn unknown_workflow_is_reported() {
        let mut h = harness(vec![], vec![]);
        h.dispatcher.handle_event(slash("e1", "/workflow", "onboarding")).await;

        let acks = h.transport.acks().await;
        assert_eq!(acks.len(), 1);
        assert_eq!(acks[0].text().unwrap(), "could not find workflow onboarding");
    }

    #[tokio::test]
    async fn workflow_with_missing_template_is_not_acked() {
        let mut h = harness(vec![WorkflowDefinition::new("onboarding", "welcome.json")], vec![]);
        h.dispatcher.handle_event(slash("e1", "/workflow", "onboarding")).await;

        assert!(h.transport.acks().await.is_empty());
    }

    #[tokio::test]
    async fn workflow_acks_with_template() {
        let source = r#"{"blocks":[{"type":"actions","elements":[{"type":"button","action_id":"step2","value":"optionA"}]}]}"#;
        let mut h = harness(
            vec![WorkflowDefinition::new("onboarding", "welcome.json")],
            vec![Template::parse("welcome.json", source).unwrap()],
        );
        h.dispatcher.handle_event(slash("e1", "/workflow", "onboarding")).await;

        let acks = h.transport.acks().await;
        assert_eq!(acks.len(), 1);
        assert_eq!(acks[0].payload.as_raw().unwrap().get(), source);
    }

    #[tokio::test]
    async fn unrecognized_command_is_a_no_op() {
        let mut h = harness(vec![], vec![]);
        h.dispatcher.handle_event(slash("e1", "/deploy", "prod")).await;

        assert!(h.transport.acks().await.is_empty());
        assert!(h.ledger.is_empty().await);
    }

    #[tokio::test]
    async fn click_without_follow_up() {
        let mut h = harness(vec![], vec![]);
        h.dispatcher.handle_event(click("e1", "step2", "optionA")).await;

        assert_eq!(h.ledger.len().await, 1);
        let acks = h.transport.acks().await;
        assert_eq!(acks.len(), 1);
        assert!(acks[0].text().unwrap().contains("optionA"));
        assert!(h.transport.posts().await.is_empty());
    }

    #[tokio::test]
    async fn click_with_follow_up() {
        let step2 = r#"{"blocks":[{"type":"section","text":{"type":"mrkdwn","text":"Thanks!"}}]}"#;
        let mut h = harness(vec![], vec![Template::parse("step2", step2).unwrap()]);
        h.dispatcher.handle_event(click("e1", "step2", "optionA")).await;

        assert_eq!(h.ledger.len().await, 1);
        let acks = h.transport.acks().await;
        assert_eq!(acks.len(), 1);
        assert!(acks[0].payload.is_empty());
        let posts = h.transport.posts().await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].channel, "C1");
        assert_eq!(posts[0].blocks, vec![json!({"type":"section","text":{"type":"mrkdwn","text":"Thanks!"}})]);
    }

    #[tokio::test]
    async fn events_api_gets_empty_ack() {
        let mut h = harness(vec![], vec![]);
        h.dispatcher
            .handle_event(InboundEvent::EventsApi {
                request: RequestHandle::new("e1"),
                payload: json!({ "type": "event_callback", "event": { "type": "app_mention" } }),
            })
            .await;

        let acks = h.transport.acks().await;
        assert_eq!(acks.len(), 1);
        assert!(acks[0].payload.is_empty());
    }

    #[tokio::test]
    async fn lifecycle_events_only_change_state() {
        let mut h = harness(vec![], vec![]);
        assert_eq!(h.dispatcher.state(), ConnectionState::Disconnected);

        h.dispatcher.handle_event(InboundEvent::Connecting).await;
        assert_eq!(h.dispatcher.state(), ConnectionState::Connecting);
        h.dispatcher
            .handle_event(InboundEvent::ConnectionError { reason: "timeout".into() })
            .await;
        assert_eq!(h.dispatcher.state(), ConnectionState::Disconnected);
        h.dispatcher.handle_event(InboundEvent::Connected).await;
        assert_eq!(h.dispatcher.state(), ConnectionState::Connected);

        assert!(h.transport.acks().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_event_is_not_acked() {
        let mut h = harness(vec![], vec![]);
        h.dispatcher
            .handle_event(InboundEvent::Unknown {
                kind: "mystery".into(),
                request: Some(RequestHandle::new("e1")),
            })
            .await;
        assert!(h.transport.acks().await.is_empty());
    }

    #[tokio::test]
    async fn run_processes_events_in_order_until_stream_closes() {
        let h = harness(vec![], vec![]);
        let (tx, rx) = mpsc::channel(16);
        tx.send(InboundEvent::Connected).await.unwrap();
        tx.send(click("e1", "a", "first")).await.unwrap();
        tx.send(click("e2", "b", "second")).await.unwrap();
        tx.send(slash("e3", "/summary", "")).await.unwrap();
        drop(tx);

        h.dispatcher.run(rx, CancellationToken::new()).await.unwrap();

        let acks = h.transport.acks().await;
        let ids: Vec<_> = acks.iter().map(|a| a.request.envelope_id().to_string()).collect();
        assert_eq!(ids, vec!["e1", "e2", "e3"]);

        let summary = acks[2].payload.to_value().unwrap();
        let lines = summary["blocks"].as_array().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0]["text"]["text"].as_str().unwrap().ends_with("selected first"));
        assert!(lines[1]["text"]["text"].as_str().unwrap().ends_with("selected second"));
    }

    #[tokio::test]
    async fn run_stops_on_cancel() {
        let h = harness(vec![], vec![]);
        let (_tx, rx) = mpsc::channel::<InboundEvent>(1);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(h.dispatcher.run(rx, cancel.clone()));
        cancel.cancel();

        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn cancel_interrupts_a_stalled_follow_up() {
        let step2 = r#"{"blocks":[{"type":"divider"}]}"#;
        let h = harness_on(
            Arc::new(RecordingTransport::stalled_posts()),
            vec![],
            vec![Template::parse("step2", step2).unwrap()],
        );
        let (tx, rx) = mpsc::channel(4);
        tx.send(click("e1", "step2", "optionA")).await.unwrap();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(h.dispatcher.run(rx, cancel.clone()));
        while h.transport.posts().await.is_empty() {
            tokio::task::yield_now().await;
        }
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("dispatcher kept waiting on the stalled post")
            .unwrap()
            .unwrap();
        assert_eq!(h.ledger.len().await, 1);
        let acks = h.transport.acks().await;
        assert_eq!(acks.len(), 1);
        assert!(acks[0].payload.is_empty());
        drop(tx);
    }
}
