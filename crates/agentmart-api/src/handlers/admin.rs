//! Staff endpoints: review queue, decisions, and consistency maintenance.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use agentmart_core::types::PageResponse;
use agentmart_entity::listing::Listing;
use agentmart_service::ConsistencyReport;
use agentmart_service::consistency::RepairSummary;

use crate::dto::request::RejectRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{ActorUser, PaginationParams};
use crate::state::AppState;

/// GET /api/admin/reviews
pub async fn review_queue(
    State(state): State<AppState>,
    actor: ActorUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Listing>>>> {
    let page = state
        .review_service
        .queue(&actor, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/admin/listings/{id}/approve
pub async fn approve_listing(
    State(state): State<AppState>,
    actor: ActorUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Listing>>> {
    let listing = state.review_service.approve(&actor, id).await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// POST /api/admin/listings/{id}/reject
pub async fn reject_listing(
    State(state): State<AppState>,
    actor: ActorUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RejectRequest>,
) -> ApiResult<Json<ApiResponse<Listing>>> {
    req.validate()?;
    let listing = state.review_service.reject(&actor, id, &req.reason).await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// GET /api/admin/consistency
pub async fn consistency_scan(
    State(state): State<AppState>,
    actor: ActorUser,
) -> ApiResult<Json<ApiResponse<ConsistencyReport>>> {
    let report = state.consistency_service.scan(&actor).await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// POST /api/admin/consistency/repair
pub async fn consistency_repair(
    State(state): State<AppState>,
    actor: ActorUser,
) -> ApiResult<Json<ApiResponse<RepairSummary>>> {
    let summary = state.consistency_service.repair(&actor).await?;
    Ok(Json(ApiResponse::ok(summary)))
}
