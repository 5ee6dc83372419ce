//! Bodies of the HTTP surface
//!
//! Field names follow the camelCase shape dashboard clients already send and read.

use serde::{Deserialize, Serialize};

use crate::sync::{SyncRequest, SyncResult};

/// Body of `POST /api/sync`.
///
/// Both fields are optional on the wire: a missing `entity` is reported as an invalid
/// request by the orchestrator, not as a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequestBody {
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub clear_existing: Option<bool>,
}

impl SyncRequestBody {
    pub fn into_request(self) -> SyncRequest {
        SyncRequest {
            entity_name: self.entity.unwrap_or_default(),
            purge_existing: self.clear_existing.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponseBody {
    pub success: bool,
    pub entity: String,
    pub synced: usize,
    pub message: String,
}

impl From<SyncResult> for SyncResponseBody {
    fn from(result: SyncResult) -> Self {
        Self {
            success: result.succeeded,
            entity: result.entity_name,
            synced: result.record_count,
            message: result.message,
        }
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_entities: Option<Vec<String>>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            available_entities: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_available_entities(mut self, names: Vec<String>) -> Self {
        self.available_entities = Some(names);
        self
    }
}

/// Catalogue entry returned by `GET /api/entities`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    pub service: String,
    pub collection: String,
    /// Local field names in declaration order
    pub fields: Vec<String>,
}
