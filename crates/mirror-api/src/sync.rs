use serde::{Deserialize, Serialize};

/// One sync invocation as requested by a caller. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncRequest {
    pub entity_name: String,
    /// Delete all existing local records of the entity before inserting the fetched set
    pub purge_existing: bool,
}

impl SyncRequest {
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            purge_existing: false,
        }
    }

    pub fn with_purge(mut self, purge_existing: bool) -> Self {
        self.purge_existing = purge_existing;
        self
    }
}

/// Summary of a finished sync invocation, returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub entity_name: String,
    pub record_count: usize,
    pub succeeded: bool,
    pub message: String,
}

impl SyncResult {
    pub fn completed(
        entity_name: impl Into<String>,
        record_count: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            record_count,
            succeeded: true,
            message: message.into(),
        }
    }
}
