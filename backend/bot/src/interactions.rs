use std::sync::Arc;

use nocode_core::{
    AckPayload, BotError, CompletionRecord, InteractionCallback, InteractionType, RequestHandle,
    Transport,
};
use nocode_workflows::{CompletionLedger, TemplateStore};
use tracing::{debug, info, warn};

/// Handles button presses and menu selections on workflow messages.
///
/// Every block action is recorded in the ledger before anything else. The
/// action id then names the template to post next, if there is one.
pub struct InteractionHandler {
    ledger: CompletionLedger,
    templates: Arc<TemplateStore>,
    transport: Arc<dyn Transport>,
}

impl InteractionHandler {
    pub fn new(
        ledger: CompletionLedger,
        templates: Arc<TemplateStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self { ledger, templates, transport }
    }

    pub async fn handle(
        &self,
        request: &RequestHandle,
        callback: InteractionCallback,
    ) -> Result<(), BotError> {
        if callback.kind != InteractionType::BlockActions {
            debug!(kind = ?callback.kind, "Ignoring non block-action interaction");
            return self.transport.ack(request, AckPayload::empty()).await;
        }

        let Some(action) = callback.primary_action() else {
            warn!(envelope = %request, "block_actions interaction carried no actions");
            return self.transport.ack(request, AckPayload::empty()).await;
        };
        if callback.actions.len() > 1 {
            debug!(ignored = callback.actions.len() - 1, "Only the first block action is honoured");
        }

        let value = action.selected_value();
        let user = callback.user.display_name();
        self.ledger
            .append(CompletionRecord::new(user, value).with_source_message(&action.action_id))
            .await;
        info!(user = %user, action_id = %action.action_id, value = %value, "Workflow step completed");

        let Some(template) = self.templates.lookup(&action.action_id) else {
            debug!(action_id = %action.action_id, "No follow-up message for action");
            let payload = AckPayload::text(&format!("could not find message callback {value}"))?;
            return self.transport.ack(request, payload).await;
        };

        if let Err(e) = self.transport.ack(request, AckPayload::empty()).await {
            warn!(envelope = %request, error = %e, "Failed to acknowledge interaction");
        }

        let channel = callback.channel.id.as_str();
        if let Err(e) = self.transport.post_message(channel, template.blocks()).await {
            warn!(channel = %channel, template = %template.name(), error = %e, "Error sending follow-up message");
        }
        Ok(())
    }
}
