//! ERP synchronization engine
//!
//! Given a logical entity name, this crate resolves the upstream service and field set,
//! fetches the upstream payload through an [`UpstreamSource`], maps it into the local
//! schema and reconciles it into a [`ReconciliationGateway`].
//!
//! - `mapping` - bidirectional field mapping and the per-entity binding
//! - `registry` - the immutable registry of syncable entities (compiled-in table or YAML)
//! - `transform` - upstream record -> local record mapping
//! - `upstream` - the upstream fetch seam and its error type
//! - `credentials` - where upstream credentials come from
//! - `storage` - the reconciliation gateway and the in-memory store
//! - `orchestrator` - the request-scoped sync state machine

pub mod catalog;
pub mod credentials;
pub mod error;
pub mod mapping;
pub mod orchestrator;
pub mod registry;
pub mod storage;
pub mod transform;
pub mod upstream;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use credentials::{CredentialSource, EnvCredentials};
pub use error::{ErrorKind, SyncError};
pub use mapping::{EntityMapping, FieldMapping, FieldMappingError};
pub use orchestrator::{SyncOrchestrator, SyncStage};
pub use registry::{EntityMappingRegistry, RegistryError, UnknownEntity};
pub use storage::{GatewayError, MemoryGateway, ReconciliationGateway};
pub use transform::transform;
pub use upstream::{UpstreamError, UpstreamSource};
