//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let store = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            warn!(error = %e, "Listing store health check failed");
            false
        }
    };

    Json(ApiResponse::ok(HealthResponse {
        status: if store { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        store,
        cached_slugs: state.slug_resolver.entry_count(),
    }))
}
