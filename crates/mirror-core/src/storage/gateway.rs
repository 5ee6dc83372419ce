use async_trait::async_trait;
use mirror_api::{LocalRecord, StoredRecord};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Local entity store as seen by the sync orchestrator.
///
/// The entity name is always an explicit parameter. Implementations give no
/// cross-call transaction guarantee; batching of `bulk_insert` is theirs to decide.
#[async_trait]
pub trait ReconciliationGateway: Send + Sync {
    /// All records currently stored for `entity`
    async fn list(&self, entity: &str) -> Result<Vec<StoredRecord>>;

    async fn delete(&self, entity: &str, id: &str) -> Result<()>;

    async fn bulk_insert(&self, entity: &str, records: Vec<LocalRecord>) -> Result<()>;
}
