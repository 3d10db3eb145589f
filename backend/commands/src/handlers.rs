/// Built-in command handlers.
///
/// Each handler is a concrete struct implementing `CommandHandler`.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use nocode_core::{AckPayload, blocks_payload, section_block};
use nocode_workflows::{CompletionLedger, TemplateStore, WorkflowRegistry};
use tracing::{debug, info};

use crate::dispatch::{CommandContext, CommandHandler, CommandOutcome};
use crate::types::CommandInvocation;

// ---------------------------------------------------------------------------
// /summary
// ---------------------------------------------------------------------------

/// Renders one section per completion record, oldest first.
pub struct SummaryHandler {
    pub ledger: CompletionLedger,
}

#[async_trait]
impl CommandHandler for SummaryHandler {
    async fn handle(&self, _ctx: &CommandContext, _inv: &CommandInvocation) -> Result<CommandOutcome> {
        let records = self.ledger.snapshot().await;
        debug!(records = records.len(), "[Commands] Rendering summary");
        let blocks = records
            .iter()
            .map(|record| section_block(&record.summary_line()))
            .collect();
        Ok(CommandOutcome::Reply(AckPayload::json(&blocks_payload(blocks))?))
    }
}

// ---------------------------------------------------------------------------
// /workflow <name>
// ---------------------------------------------------------------------------

/// Replies with the template a workflow points at.
///
/// An unknown workflow name is reported to the user. A known workflow whose
/// template is missing is only logged and left unacknowledged.
pub struct WorkflowHandler {
    pub workflows: Arc<WorkflowRegistry>,
    pub templates: Arc<TemplateStore>,
}

#[async_trait]
impl CommandHandler for WorkflowHandler {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandOutcome> {
        let name = inv.raw_args.as_str();
        let Some(workflow) = self.workflows.lookup(name) else {
            info!(workflow = %name, user = %ctx.user_name, "[Commands] Unknown workflow");
            return CommandOutcome::text(format!("could not find workflow {name}"));
        };

        match self.templates.lookup(&workflow.file) {
            Some(template) => {
                info!(workflow = %name, template = %workflow.file, "[Commands] Replaying workflow");
                Ok(CommandOutcome::Reply(AckPayload::template(template)))
            }
            None => {
                debug!(workflow = %name, template = %workflow.file, "[Commands] Message is not available");
                Ok(CommandOutcome::NoReply)
            }
        }
    }
}
