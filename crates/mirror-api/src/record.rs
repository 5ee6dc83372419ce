use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped key/value record exactly as the upstream ERP service returned it.
///
/// Only lives for the duration of one sync invocation.
pub type RawUpstreamRecord = Map<String, Value>;

/// Record in the local schema of one entity.
///
/// Every key is a local field name declared in the entity's field mapping.
pub type LocalRecord = Map<String, Value>;

/// A record held by the local store, together with the id the store assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub data: LocalRecord,
}

impl StoredRecord {
    pub fn new(id: impl Into<String>, data: LocalRecord) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}
