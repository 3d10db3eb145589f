pub mod detection;
pub mod dispatch;
pub mod handlers;
pub mod registry;
pub mod types;

pub use detection::detect_command;
pub use dispatch::{CommandContext, CommandDispatcher, CommandHandler, CommandOutcome};
pub use handlers::{SummaryHandler, WorkflowHandler};
pub use registry::{CommandRegistry, INVOKE_WORKFLOW, LIST_COMPLETIONS, builtin_commands};
pub use types::{CommandDef, CommandInvocation};

use std::sync::Arc;

use nocode_workflows::{CompletionLedger, TemplateStore, WorkflowRegistry};

/// Build a dispatcher pre-wired with the built-in handlers.
pub fn build_default_dispatcher(
    ledger: CompletionLedger,
    workflows: Arc<WorkflowRegistry>,
    templates: Arc<TemplateStore>,
) -> CommandDispatcher {
    let mut dispatcher = CommandDispatcher::new();
    dispatcher.register(LIST_COMPLETIONS, Arc::new(SummaryHandler { ledger }));
    dispatcher.register(INVOKE_WORKFLOW, Arc::new(WorkflowHandler { workflows, templates }));
    dispatcher
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_command_has_a_handler() {
        let dispatcher = build_default_dispatcher(
            CompletionLedger::new(),
            Arc::new(WorkflowRegistry::default()),
            Arc::new(TemplateStore::default()),
        );
        for cmd in builtin_commands() {
            assert!(dispatcher.has_handler(&cmd.key), "no handler for {}", cmd.key);
        }
    }
}
