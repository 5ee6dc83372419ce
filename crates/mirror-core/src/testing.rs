//! Recording fakes for sync tests
//!
//! `RecordingUpstream` and `RecordingGateway` append to one shared [`CallLog`], so a
//! test can assert on the global order of upstream and store calls (e.g. that every
//! delete happened before the insert, or that no fetch happened at all).

use async_trait::async_trait;
use mirror_api::{LocalRecord, RawUpstreamRecord, StoredRecord, UpstreamCredentials};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::credentials::CredentialSource;
use crate::storage::{GatewayError, MemoryGateway, ReconciliationGateway};
use crate::upstream::{UpstreamError, UpstreamSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Fetch { service: String, collection: String },
    List { entity: String },
    Delete { entity: String, id: String },
    BulkInsert { entity: String, count: usize },
}

#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl CallLog {
    fn push(&self, call: RecordedCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Calls that reached the store (list, delete, insert)
    pub fn store_calls(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, RecordedCall::Fetch { .. }))
            .collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.count(|call| matches!(call, RecordedCall::Fetch { .. }))
    }

    pub fn delete_count(&self) -> usize {
        self.count(|call| matches!(call, RecordedCall::Delete { .. }))
    }

    pub fn insert_count(&self) -> usize {
        self.count(|call| matches!(call, RecordedCall::BulkInsert { .. }))
    }

    fn count(&self, predicate: impl Fn(&RecordedCall) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }
}

/// Upstream double answering every fetch with the same canned result.
pub struct RecordingUpstream {
    log: CallLog,
    response: Result<Vec<RawUpstreamRecord>, UpstreamError>,
}

impl RecordingUpstream {
    pub fn new(log: CallLog, response: Result<Vec<RawUpstreamRecord>, UpstreamError>) -> Self {
        Self { log, response }
    }
}

#[async_trait]
impl UpstreamSource for RecordingUpstream {
    async fn fetch(
        &self,
        service_namespace: &str,
        resource_collection: &str,
        _credentials: &UpstreamCredentials,
    ) -> Result<Vec<RawUpstreamRecord>, UpstreamError> {
        self.log.push(RecordedCall::Fetch {
            service: service_namespace.to_string(),
            collection: resource_collection.to_string(),
        });
        self.response.clone()
    }

    fn system_id(&self) -> &str {
        "erp-fake"
    }
}

/// Store double over a [`MemoryGateway`] with optional fault injection.
#[derive(Clone)]
pub struct RecordingGateway {
    log: CallLog,
    inner: MemoryGateway,
    fail_list: bool,
    fail_delete_after: Option<usize>,
    fail_insert: bool,
    deletes: Arc<AtomicUsize>,
}

impl RecordingGateway {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            inner: MemoryGateway::new(),
            fail_list: false,
            fail_delete_after: None,
            fail_insert: false,
            deletes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fail_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Let `successful` deletions through, then fail every following one
    pub fn fail_delete_after(mut self, successful: usize) -> Self {
        self.fail_delete_after = Some(successful);
        self
    }

    pub fn fail_insert(mut self) -> Self {
        self.fail_insert = true;
        self
    }

    /// Underlying store, for assertions and unrecorded reads
    pub fn inner(&self) -> &MemoryGateway {
        &self.inner
    }

    /// Pre-populate the store without recording a call
    pub async fn seed(&self, entity: &str, records: Vec<LocalRecord>) {
        if let Err(e) = self.inner.bulk_insert(entity, records).await {
            panic!("seeding {} failed: {}", entity, e);
        }
    }
}

#[async_trait]
impl ReconciliationGateway for RecordingGateway {
    async fn list(&self, entity: &str) -> Result<Vec<StoredRecord>, GatewayError> {
        self.log.push(RecordedCall::List {
            entity: entity.to_string(),
        });
        if self.fail_list {
            return Err(GatewayError::Backend("injected list failure".to_string()));
        }
        self.inner.list(entity).await
    }

    async fn delete(&self, entity: &str, id: &str) -> Result<(), GatewayError> {
        self.log.push(RecordedCall::Delete {
            entity: entity.to_string(),
            id: id.to_string(),
        });
        let attempt = self.deletes.fetch_add(1, Ordering::SeqCst);
        if matches!(self.fail_delete_after, Some(limit) if attempt >= limit) {
            return Err(GatewayError::Backend(format!(
                "injected delete failure for {} {}",
                entity, id
            )));
        }
        self.inner.delete(entity, id).await
    }

    async fn bulk_insert(
        &self,
        entity: &str,
        records: Vec<LocalRecord>,
    ) -> Result<(), GatewayError> {
        self.log.push(RecordedCall::BulkInsert {
            entity: entity.to_string(),
            count: records.len(),
        });
        if self.fail_insert {
            return Err(GatewayError::Backend("injected insert failure".to_string()));
        }
        self.inner.bulk_insert(entity, records).await
    }
}

/// Credential source returning a fixed value.
pub struct StaticCredentials(Option<UpstreamCredentials>);

impl StaticCredentials {
    pub fn new(credentials: Option<UpstreamCredentials>) -> Self {
        Self(credentials)
    }
}

impl CredentialSource for StaticCredentials {
    fn credentials(&self) -> Option<UpstreamCredentials> {
        self.0.clone()
    }
}
