//! Request-scoped sync coordinator
//!
//! One invocation walks a linear state machine, each stage able to exit with an error:
//!
//! `ValidateInput -> ResolveMapping -> CheckCredentials -> Fetch -> Transform
//!  -> PurgeExisting (optional) -> BulkInsert -> Done`
//!
//! An empty fetch result ends the invocation at `Fetch` with zero records: nothing is
//! purged when there is nothing to replace it with.
//!
//! Purging is NOT atomic. Existing records are deleted one at a time, each deletion
//! awaited before the next; if one fails, the already-deleted records stay deleted, the
//! rest stay in place, and the insert is never attempted. Two concurrent syncs of the
//! same entity are not coordinated and may interleave their purge and insert phases.

use mirror_api::{SyncRequest, SyncResult};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn, Span};

use crate::credentials::CredentialSource;
use crate::error::{ErrorKind, SyncError};
use crate::registry::EntityMappingRegistry;
use crate::storage::ReconciliationGateway;
use crate::transform::transform;
use crate::upstream::UpstreamSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    ValidateInput,
    ResolveMapping,
    CheckCredentials,
    Fetch,
    Transform,
    PurgeExisting,
    BulkInsert,
    Done,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStage::ValidateInput => "validate_input",
            SyncStage::ResolveMapping => "resolve_mapping",
            SyncStage::CheckCredentials => "check_credentials",
            SyncStage::Fetch => "fetch",
            SyncStage::Transform => "transform",
            SyncStage::PurgeExisting => "purge_existing",
            SyncStage::BulkInsert => "bulk_insert",
            SyncStage::Done => "done",
        };
        f.write_str(name)
    }
}

pub struct SyncOrchestrator {
    registry: Arc<EntityMappingRegistry>,
    upstream: Arc<dyn UpstreamSource>,
    gateway: Arc<dyn ReconciliationGateway>,
    credentials: Arc<dyn CredentialSource>,
}

impl SyncOrchestrator {
    pub fn new(
        registry: Arc<EntityMappingRegistry>,
        upstream: Arc<dyn UpstreamSource>,
        gateway: Arc<dyn ReconciliationGateway>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        Self {
            registry,
            upstream,
            gateway,
            credentials,
        }
    }

    pub fn registry(&self) -> &EntityMappingRegistry {
        &self.registry
    }

    pub fn gateway(&self) -> &Arc<dyn ReconciliationGateway> {
        &self.gateway
    }

    /// Run one sync invocation to completion or to its first failure
    #[tracing::instrument(
        name = "mirror.sync",
        skip(self, request),
        fields(
            entity = %request.entity_name,
            purge = request.purge_existing,
            sync.fetched = tracing::field::Empty,
            sync.purged = tracing::field::Empty,
            sync.inserted = tracing::field::Empty,
        )
    )]
    pub async fn sync(&self, request: SyncRequest) -> Result<SyncResult, SyncError> {
        let result = self.run(request).await;
        if let Err(err) = &result {
            match err.kind() {
                ErrorKind::ClientCorrectable => {
                    info!("[SyncOrchestrator] Rejected at {}: {}", err.stage(), err)
                }
                ErrorKind::OperatorCorrectable => {
                    warn!("[SyncOrchestrator] Failed at {}: {}", err.stage(), err)
                }
            }
        }
        result
    }

    async fn run(&self, request: SyncRequest) -> Result<SyncResult, SyncError> {
        if request.entity_name.trim().is_empty() {
            return Err(SyncError::InvalidRequest {
                available: self.registry.list_names(),
            });
        }

        let mapping = self.registry.resolve(&request.entity_name)?;
        let entity = mapping.logical_name();

        // Checked before anything touches the network
        let credentials = self
            .credentials
            .credentials()
            .ok_or(SyncError::Configuration)?;

        debug!(
            "[SyncOrchestrator] {}: fetching {}/{} from {}",
            SyncStage::Fetch,
            mapping.service_namespace(),
            mapping.resource_collection(),
            self.upstream.system_id()
        );
        let raw_records = self
            .upstream
            .fetch(
                mapping.service_namespace(),
                mapping.resource_collection(),
                &credentials,
            )
            .await?;
        drop(credentials);
        Span::current().record("sync.fetched", raw_records.len());

        if raw_records.is_empty() {
            info!(
                "[SyncOrchestrator] Upstream returned no {} records; store left untouched",
                entity
            );
            return Ok(SyncResult::completed(
                entity,
                0,
                format!("No {} records returned by the ERP system", entity),
            ));
        }

        let records = transform(raw_records, mapping.field_mapping());
        let count = records.len();

        if request.purge_existing {
            let purged = self.purge(entity).await?;
            Span::current().record("sync.purged", purged);
        }

        self.gateway
            .bulk_insert(entity, records)
            .await
            .map_err(|source| SyncError::Persistence {
                entity: entity.to_string(),
                count,
                source,
            })?;
        Span::current().record("sync.inserted", count);

        info!(
            "[SyncOrchestrator] {}: synced {} {} records (purged first: {})",
            SyncStage::Done,
            count,
            entity,
            request.purge_existing
        );
        Ok(SyncResult::completed(
            entity,
            count,
            format!("Successfully synced {} {} records", count, entity),
        ))
    }

    /// Delete every existing record of `entity`, strictly one at a time
    async fn purge(&self, entity: &str) -> Result<usize, SyncError> {
        let existing = self
            .gateway
            .list(entity)
            .await
            .map_err(|source| SyncError::ListExisting {
                entity: entity.to_string(),
                source,
            })?;
        let total = existing.len();
        debug!(
            "[SyncOrchestrator] {}: deleting {} existing {} records",
            SyncStage::PurgeExisting,
            total,
            entity
        );

        for (deleted, record) in existing.iter().enumerate() {
            if let Err(source) = self.gateway.delete(entity, &record.id).await {
                return Err(SyncError::PartialPurge {
                    entity: entity.to_string(),
                    deleted,
                    total,
                    source,
                });
            }
        }

        Ok(total)
    }
}
