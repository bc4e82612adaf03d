//! Public agent lookup by routing slug.

use axum::Json;
use axum::extract::{Path, State};

use agentmart_entity::listing::Listing;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::ActorUser;
use crate::state::AppState;

/// GET /api/agents/{slug}
///
/// Anonymous callers only see live listings; owners and staff may also
/// resolve draft and archived slugs.
pub async fn get_agent(
    State(state): State<AppState>,
    actor: Option<ActorUser>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ApiResponse<Listing>>> {
    let actor = actor.unwrap_or_else(ActorUser::anonymous);
    let listing = state.listing_service.resolve_slug(&actor, &slug).await?;
    Ok(Json(ApiResponse::ok(listing)))
}
