//! Application builder: wires router, middleware, and state into an Axum app.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use agentmart_core::config::{AppConfig, CorsConfig};
use agentmart_core::error::AppError;
use agentmart_database::DatabasePool;
use agentmart_database::store::ListingStore;
use agentmart_service::{AuditNotifier, NotifierSet, TracingNotifier};

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state)
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Runs the AgentMart server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db: DatabasePool) -> Result<(), AppError> {
    info!("Starting AgentMart server...");

    // ── Step 1: Listing store ────────────────────────────────────
    let store: Arc<dyn ListingStore> = Arc::new(db.listing_store());

    // ── Step 2: Transition notifiers ─────────────────────────────
    let notifiers = NotifierSet::new()
        .with(Arc::new(TracingNotifier))
        .with(Arc::new(AuditNotifier::new(db.audit_repository())));
    info!(notifiers = notifiers.len(), "Transition notifiers registered");

    // ── Step 3: Services and state ───────────────────────────────
    let app_state = AppState::new(config.clone(), store, notifiers);

    // ── Step 4: Build and start HTTP server ──────────────────────
    let app = build_app(app_state, &config.server.cors);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("AgentMart server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 5: Drain connections ────────────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    info!(grace_seconds = grace.as_secs(), "Shutting down, closing database pool");
    if tokio::time::timeout(grace, db.close()).await.is_err() {
        warn!("Database pool did not close within the grace period");
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
