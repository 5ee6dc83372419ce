use thiserror::Error;

use crate::orchestrator::SyncStage;
use crate::registry::UnknownEntity;
use crate::storage::GatewayError;
use crate::upstream::UpstreamError;

/// Who can fix a failed sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; the caller can correct and resubmit
    ClientCorrectable,
    /// Configuration, upstream or store problem; needs an operator
    OperatorCorrectable,
}

/// Terminal failure of one sync invocation. Nothing is retried.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Entity name is required")]
    InvalidRequest { available: Vec<String> },

    #[error("Unknown entity '{name}'")]
    UnknownEntity { name: String, available: Vec<String> },

    #[error("Upstream ERP credentials are not configured")]
    Configuration,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Failed to list existing {entity} records: {source}")]
    ListExisting {
        entity: String,
        #[source]
        source: GatewayError,
    },

    /// Deletion failed mid-purge. The store keeps the records not yet deleted
    /// and nothing new was inserted.
    #[error("Purge of {entity} aborted after {deleted} of {total} deletions: {source}")]
    PartialPurge {
        entity: String,
        deleted: usize,
        total: usize,
        #[source]
        source: GatewayError,
    },

    #[error("Failed to store {count} {entity} records: {source}")]
    Persistence {
        entity: String,
        count: usize,
        #[source]
        source: GatewayError,
    },
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::InvalidRequest { .. } | SyncError::UnknownEntity { .. } => {
                ErrorKind::ClientCorrectable
            }
            _ => ErrorKind::OperatorCorrectable,
        }
    }

    /// Stage of the sync state machine the error exits from
    pub fn stage(&self) -> SyncStage {
        match self {
            SyncError::InvalidRequest { .. } => SyncStage::ValidateInput,
            SyncError::UnknownEntity { .. } => SyncStage::ResolveMapping,
            SyncError::Configuration => SyncStage::CheckCredentials,
            SyncError::Upstream(_) => SyncStage::Fetch,
            SyncError::ListExisting { .. } | SyncError::PartialPurge { .. } => {
                SyncStage::PurgeExisting
            }
            SyncError::Persistence { .. } => SyncStage::BulkInsert,
        }
    }

    /// Valid entity names, for the validation failures
    pub fn available_entities(&self) -> Option<&[String]> {
        match self {
            SyncError::InvalidRequest { available } | SyncError::UnknownEntity { available, .. } => {
                Some(available)
            }
            _ => None,
        }
    }
}

impl From<UnknownEntity> for SyncError {
    fn from(miss: UnknownEntity) -> Self {
        SyncError::UnknownEntity {
            name: miss.name,
            available: miss.available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            SyncError::InvalidRequest { available: vec![] }.kind(),
            ErrorKind::ClientCorrectable
        );
        assert_eq!(SyncError::Configuration.kind(), ErrorKind::OperatorCorrectable);
        assert_eq!(
            SyncError::Upstream(UpstreamError::Status {
                status: 503,
                body: "maintenance".to_string()
            })
            .kind(),
            ErrorKind::OperatorCorrectable
        );
    }

    #[test]
    fn test_partial_purge_message() {
        let err = SyncError::PartialPurge {
            entity: "Shipment".to_string(),
            deleted: 2,
            total: 5,
            source: GatewayError::Backend("connection reset".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Purge of Shipment aborted after 2 of 5 deletions: Backend error: connection reset"
        );
        assert_eq!(err.stage(), SyncStage::PurgeExisting);
    }
}
