//! Shared types for the ERP mirror
//!
//! Everything that crosses a crate boundary or the HTTP surface lives here:
//! - `record` - raw upstream records, local records and stored records
//! - `sync` - the per-invocation request and result
//! - `credentials` - upstream credentials (never logged)
//! - `http` - request/response bodies of the HTTP surface

pub mod credentials;
pub mod http;
pub mod record;
pub mod sync;

pub use credentials::UpstreamCredentials;
pub use http::{EntityDescriptor, ErrorBody, SyncRequestBody, SyncResponseBody};
pub use record::{LocalRecord, RawUpstreamRecord, StoredRecord};
pub use sync::{SyncRequest, SyncResult};
