//! Route definitions for the AgentMart HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to every handler via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and request logging.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(listing_routes())
        .merge(agent_routes())
        .merge(admin_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Seller endpoints
fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/listings", post(handlers::listing::create_listing))
        .route("/listings/mine", get(handlers::listing::list_my_listings))
        .route(
            "/listings/{id}",
            get(handlers::listing::get_listing).put(handlers::listing::update_listing),
        )
        .route("/listings/{id}/lineage", get(handlers::listing::get_lineage))
        .route("/listings/{id}/submit", post(handlers::listing::submit_listing))
        .route("/listings/{id}/updates", post(handlers::listing::request_update))
}

/// Public slug lookup
fn agent_routes() -> Router<AppState> {
    Router::new().route("/agents/{slug}", get(handlers::agent::get_agent))
}

/// Staff review and maintenance
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/reviews", get(handlers::admin::review_queue))
        .route(
            "/admin/listings/{id}/approve",
            post(handlers::admin::approve_listing),
        )
        .route(
            "/admin/listings/{id}/reject",
            post(handlers::admin::reject_listing),
        )
        .route("/admin/consistency", get(handlers::admin::consistency_scan))
        .route(
            "/admin/consistency/repair",
            post(handlers::admin::consistency_repair),
        )
}
