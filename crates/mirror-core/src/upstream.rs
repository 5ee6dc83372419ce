//! Upstream fetch seam
//!
//! [`UpstreamSource`] is implemented by the real HTTP client (`mirror-erp`) and by the
//! recording fake in [`crate::testing`].

use async_trait::async_trait;
use mirror_api::{RawUpstreamRecord, UpstreamCredentials};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// Non-success response. Status and raw body are kept for diagnostics.
    #[error("Upstream ERP request failed with HTTP {status}")]
    Status { status: u16, body: String },

    #[error("Upstream ERP request could not be completed: {0}")]
    Transport(String),

    #[error("Upstream ERP response could not be decoded: {0}")]
    Decode(String),

    #[error("Upstream ERP client could not be created: {0}")]
    Client(String),
}

impl UpstreamError {
    /// Human-readable detail for the error body
    pub fn details(&self) -> String {
        match self {
            UpstreamError::Status { body, .. } => body.clone(),
            UpstreamError::Transport(detail)
            | UpstreamError::Decode(detail)
            | UpstreamError::Client(detail) => detail.clone(),
        }
    }
}

/// Authenticated, read-only access to named upstream resources.
///
/// One call is one remote read; implementations do not retry.
#[async_trait]
pub trait UpstreamSource: Send + Sync {
    async fn fetch(
        &self,
        service_namespace: &str,
        resource_collection: &str,
        credentials: &UpstreamCredentials,
    ) -> Result<Vec<RawUpstreamRecord>, UpstreamError>;

    /// Identifier used in logs (e.g. "erp", "erp-fake")
    fn system_id(&self) -> &str;
}
