//! Workflow name to template filename, built once from configuration.

use std::collections::HashMap;

use nocode_core::WorkflowDefinition;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct WorkflowRegistry {
    workflows: HashMap<String, WorkflowDefinition>,
}

impl WorkflowRegistry {
    /// Index definitions by name. A later definition with the same name
    /// replaces an earlier one.
    pub fn build(definitions: impl IntoIterator<Item = WorkflowDefinition>) -> Self {
        let mut workflows = HashMap::new();
        for def in definitions {
            debug!(workflow = %def.name, file = %def.file, "Registering workflow");
            if let Some(previous) = workflows.insert(def.name.clone(), def) {
                warn!(workflow = %previous.name, replaced_file = %previous.file, "Duplicate workflow name; keeping the last one");
            }
        }
        Self { workflows }
    }

    pub fn lookup(&self, name: &str) -> Option<&WorkflowDefinition> {
        self.workflows.get(name)
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    /// Workflow names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.workflows.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
