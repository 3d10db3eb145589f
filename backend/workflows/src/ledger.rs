//! Append-only record of finished interactive workflows.
//!
//! Lives for the life of the process; nothing is persisted.

use std::sync::Arc;

use nocode_core::CompletionRecord;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared handle to the completion log. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct CompletionLedger {
    records: Arc<RwLock<Vec<CompletionRecord>>>,
}

impl CompletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record at the end of the log.
    pub async fn append(&self, record: CompletionRecord) {
        let mut w = self.records.write().await;
        w.push(record);
        debug!(total = w.len(), "Recorded workflow completion");
    }

    /// Point-in-time copy of every record, oldest first.
    ///
    /// The read lock is held only while cloning.
    pub async fn snapshot(&self) -> Vec<CompletionRecord> {
        let r = self.records.read().await;
        r.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
