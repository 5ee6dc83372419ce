//! HTTP rendering of failures
//!
//! Validation failures echo the valid entity names so the caller can correct the
//! request. An upstream HTTP failure keeps the upstream's status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mirror_api::ErrorBody;
use mirror_core::{GatewayError, SyncError, UnknownEntity, UpstreamError};

#[derive(Debug)]
pub enum ApiError {
    Sync(SyncError),
    /// Unknown entity on a read-only route
    NotFound(UnknownEntity),
    Store(GatewayError),
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        ApiError::Sync(err)
    }
}

impl ApiError {
    pub fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            ApiError::Sync(err) => sync_status_and_body(err),
            ApiError::NotFound(miss) => (
                StatusCode::NOT_FOUND,
                ErrorBody::new(format!("Unknown entity: {}", miss.name))
                    .with_available_entities(miss.available.clone()),
            ),
            ApiError::Store(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Failed to read local records").with_details(err.to_string()),
            ),
        }
    }
}

fn sync_status_and_body(err: &SyncError) -> (StatusCode, ErrorBody) {
    match err {
        SyncError::InvalidRequest { available } => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new(err.to_string()).with_available_entities(available.clone()),
        ),
        SyncError::UnknownEntity { name, available } => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new(format!("Invalid entity: {}", name))
                .with_available_entities(available.clone()),
        ),
        SyncError::Configuration => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::new(err.to_string()),
        ),
        SyncError::Upstream(upstream) => {
            let status = match upstream {
                UpstreamError::Status { status, .. } => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                _ => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                ErrorBody::new("ERP API error").with_details(upstream.details()),
            )
        }
        SyncError::ListExisting { .. }
        | SyncError::PartialPurge { .. }
        | SyncError::Persistence { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::new("Sync failed").with_details(err.to_string()),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["SalesInvoice".to_string(), "SalesOrder".to_string()]
    }

    #[test]
    fn test_unknown_entity_is_bad_request() {
        let (status, body) = ApiError::from(SyncError::UnknownEntity {
            name: "Widget".to_string(),
            available: names(),
        })
        .status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid entity: Widget");
        assert_eq!(body.available_entities, Some(names()));
    }

    #[test]
    fn test_upstream_status_passthrough() {
        let (status, body) = ApiError::from(SyncError::Upstream(UpstreamError::Status {
            status: 503,
            body: "maintenance".to_string(),
        }))
        .status_and_body();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.details.as_deref(), Some("maintenance"));
    }

    #[test]
    fn test_unrepresentable_upstream_status_falls_back() {
        let (status, _) = ApiError::from(SyncError::Upstream(UpstreamError::Status {
            status: 1000,
            body: String::new(),
        }))
        .status_and_body();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_transport_failure_is_bad_gateway() {
        let (status, body) = ApiError::from(SyncError::Upstream(UpstreamError::Transport(
            "connection refused".to_string(),
        )))
        .status_and_body();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.details.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_partial_purge_is_internal_error() {
        let (status, body) = ApiError::from(SyncError::PartialPurge {
            entity: "SalesInvoice".to_string(),
            deleted: 1,
            total: 3,
            source: GatewayError::Backend("disk full".to_string()),
        })
        .status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Sync failed");
        assert!(body.details.unwrap().contains("1 of 3"));
        assert_eq!(body.available_entities, None);
    }

    #[test]
    fn test_missing_credentials_has_no_details() {
        let (status, body) = ApiError::from(SyncError::Configuration).status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.details, None);
    }
}
