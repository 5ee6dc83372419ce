use std::sync::Arc;

use anyhow::{Context, Result};
use mirror_api::{SyncRequest, SyncResponseBody, SyncResult};
use mirror_core::{MemoryGateway, ReconciliationGateway, SyncError, SyncOrchestrator};
use mirror_erp::ErpClient;
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::MirrorConfig;
use crate::error::ApiError;
use crate::routes::{router, AppState};
use crate::telemetry;

/// Wire the configured registry, ERP client and credentials around `gateway`
pub fn build_orchestrator(
    config: &MirrorConfig,
    gateway: Arc<dyn ReconciliationGateway>,
) -> Result<SyncOrchestrator> {
    let registry = config.load_registry()?;
    let client = ErpClient::new(config.erp_base_url()?)?;
    info!(
        "[App] Upstream ERP at {} (credentials from ${} / ${})",
        client.base_url(),
        config.erp.username_env,
        config.erp.password_env
    );

    Ok(SyncOrchestrator::new(
        Arc::new(registry),
        Arc::new(client),
        gateway,
        Arc::new(config.credentials()),
    ))
}

pub async fn serve(config: &MirrorConfig) -> Result<()> {
    telemetry::install_propagator();
    let orchestrator = build_orchestrator(config, Arc::new(MemoryGateway::new()))?;
    let app = router(AppState::new(orchestrator));

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("[App] Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("[App] Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("[App] Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Run one sync against a throwaway in-memory store.
///
/// Checks connectivity, credentials and the entity mapping. Nothing is persisted, so
/// the success message reports a check rather than a sync. Returns whether it succeeded
/// and the JSON body to print.
pub async fn sync_once(
    config: &MirrorConfig,
    entity: &str,
    clear_existing: bool,
) -> Result<(bool, Value)> {
    telemetry::install_propagator();
    let orchestrator = build_orchestrator(config, Arc::new(MemoryGateway::new()))?;
    let request = SyncRequest::new(entity).with_purge(clear_existing);
    check_outcome(orchestrator.sync(request).await)
}

fn check_outcome(outcome: std::result::Result<SyncResult, SyncError>) -> Result<(bool, Value)> {
    match outcome {
        Ok(result) => {
            let mut body = SyncResponseBody::from(result);
            body.message = format!(
                "Check passed: fetched and mapped {} {} records (nothing persisted)",
                body.synced, body.entity
            );
            Ok((true, serde_json::to_value(body)?))
        }
        Err(err) => {
            let (_, body) = ApiError::from(err).status_and_body();
            Ok((false, serde_json::to_value(body)?))
        }
    }
}

pub fn entity_names(config: &MirrorConfig) -> Result<Vec<String>> {
    Ok(config.load_registry()?.list_names())
}
