//! In-memory state behind the bot: templates and workflows loaded once at
//! startup, plus the shared log of finished interactions.

pub mod ledger;
pub mod registry;
pub mod template_store;

pub use ledger::CompletionLedger;
pub use registry::WorkflowRegistry;
pub use template_store::TemplateStore;
