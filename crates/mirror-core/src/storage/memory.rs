//! In-process implementation of [`ReconciliationGateway`]
//!
//! Records are kept per entity in insertion order and get a fresh v4 UUID on insert.
//! Cloning shares the underlying store.

use async_trait::async_trait;
use mirror_api::{LocalRecord, StoredRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::gateway::{GatewayError, ReconciliationGateway, Result};

#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    entities: Arc<RwLock<HashMap<String, Vec<StoredRecord>>>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, entity: &str) -> usize {
        self.entities
            .read()
            .await
            .get(entity)
            .map_or(0, |records| records.len())
    }
}

#[async_trait]
impl ReconciliationGateway for MemoryGateway {
    async fn list(&self, entity: &str) -> Result<Vec<StoredRecord>> {
        Ok(self
            .entities
            .read()
            .await
            .get(entity)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete(&self, entity: &str, id: &str) -> Result<()> {
        let mut entities = self.entities.write().await;
        let records = entities.get_mut(entity);
        let position = records
            .as_ref()
            .and_then(|records| records.iter().position(|r| r.id == id));

        match (records, position) {
            (Some(records), Some(position)) => {
                records.remove(position);
                Ok(())
            }
            _ => Err(GatewayError::NotFound {
                entity: entity.to_string(),
                id: id.to_string(),
            }),
        }
    }

    async fn bulk_insert(&self, entity: &str, records: Vec<LocalRecord>) -> Result<()> {
        let count = records.len();
        let mut entities = self.entities.write().await;
        let stored = entities.entry(entity.to_string()).or_default();
        stored.extend(
            records
                .into_iter()
                .map(|data| StoredRecord::new(Uuid::new_v4().to_string(), data)),
        );
        debug!(
            "[MemoryGateway] Inserted {} {} records (total {})",
            count,
            entity,
            stored.len()
        );
        Ok(())
    }
}
