//! Seller-facing listing handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use agentmart_entity::listing::Listing;
use agentmart_service::Lineage;

use crate::dto::request::ListingContentRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::ActorUser;
use crate::state::AppState;

/// POST /api/listings
pub async fn create_listing(
    State(state): State<AppState>,
    actor: ActorUser,
    Json(req): Json<ListingContentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Listing>>)> {
    req.validate()?;
    let listing = state
        .listing_service
        .create(&actor, req.into_content())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(listing))))
}

/// GET /api/listings/mine
pub async fn list_my_listings(
    State(state): State<AppState>,
    actor: ActorUser,
) -> ApiResult<Json<ApiResponse<Vec<Listing>>>> {
    let listings = state.listing_service.list_mine(&actor).await?;
    Ok(Json(ApiResponse::ok(listings)))
}

/// GET /api/listings/{id}
pub async fn get_listing(
    State(state): State<AppState>,
    actor: Option<ActorUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Listing>>> {
    let actor = actor.unwrap_or_else(ActorUser::anonymous);
    let listing = state.listing_service.get(&actor, id).await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// PUT /api/listings/{id}
pub async fn update_listing(
    State(state): State<AppState>,
    actor: ActorUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ListingContentRequest>,
) -> ApiResult<Json<ApiResponse<Listing>>> {
    req.validate()?;
    let listing = state
        .listing_service
        .edit(&actor, id, req.into_content())
        .await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// GET /api/listings/{id}/lineage
pub async fn get_lineage(
    State(state): State<AppState>,
    actor: ActorUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Lineage>>> {
    let lineage = state.listing_service.lineage(&actor, id).await?;
    Ok(Json(ApiResponse::ok(lineage)))
}

/// POST /api/listings/{id}/submit
pub async fn submit_listing(
    State(state): State<AppState>,
    actor: ActorUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Listing>>> {
    let listing = state.listing_service.submit(&actor, id).await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// POST /api/listings/{id}/updates
pub async fn request_update(
    State(state): State<AppState>,
    actor: ActorUser,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Listing>>)> {
    let child = state.listing_service.request_update(&actor, id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(child))))
}
