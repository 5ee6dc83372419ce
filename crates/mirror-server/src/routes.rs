use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use mirror_api::{EntityDescriptor, StoredRecord, SyncRequestBody, SyncResponseBody};
use mirror_core::SyncOrchestrator;
use opentelemetry::trace::FutureExt;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::telemetry;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SyncOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: SyncOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/sync", post(sync_entity))
        .route("/api/entities", get(list_entities))
        .route("/api/entities/:entity/records", get(list_records))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /api/sync`. A caller's `traceparent` becomes the parent context of the sync.
async fn sync_entity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SyncRequestBody>,
) -> Result<Json<SyncResponseBody>, ApiError> {
    let parent_cx = telemetry::extract_context(&headers);
    let result = state
        .orchestrator
        .sync(body.into_request())
        .with_context(parent_cx)
        .await?;
    Ok(Json(result.into()))
}

async fn list_entities(State(state): State<AppState>) -> Json<Vec<EntityDescriptor>> {
    let entities = state
        .orchestrator
        .registry()
        .iter()
        .map(|mapping| EntityDescriptor {
            name: mapping.logical_name().to_string(),
            service: mapping.service_namespace().to_string(),
            collection: mapping.resource_collection().to_string(),
            fields: mapping
                .field_mapping()
                .local_fields()
                .map(str::to_string)
                .collect(),
        })
        .collect();
    Json(entities)
}

async fn list_records(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    let mapping = state
        .orchestrator
        .registry()
        .resolve(&entity)
        .map_err(ApiError::NotFound)?;
    let records = state
        .orchestrator
        .gateway()
        .list(mapping.logical_name())
        .await
        .map_err(ApiError::Store)?;
    Ok(Json(records))
}
