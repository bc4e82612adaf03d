//! `ActorUser` extractor: reads the caller identity asserted by the gateway.
//!
//! Authentication happens upstream; the gateway forwards the verified user
//! as `X-Actor-Id` (UUID) and `X-Actor-Role` (`admin`, `staff`, `seller`,
//! `buyer`).

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use uuid::Uuid;

use agentmart_core::error::AppError;
use agentmart_entity::user::UserRole;
use agentmart_service::RequestContext;

use crate::error::ApiError;

/// Header carrying the acting user's ID.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Header carrying the acting user's role.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Identified caller context available in handlers.
#[derive(Debug, Clone)]
pub struct ActorUser(pub RequestContext);

impl ActorUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }

    /// Context for an unidentified caller on public endpoints.
    pub fn anonymous() -> Self {
        Self(RequestContext::new(Uuid::nil(), UserRole::Buyer, None, None))
    }
}

impl std::ops::Deref for ActorUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ActorUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, ACTOR_ID_HEADER)
            .ok_or_else(|| AppError::authentication("Missing X-Actor-Id header"))?;
        let user_id = Uuid::parse_str(user_id)
            .map_err(|_| AppError::authentication("X-Actor-Id is not a valid UUID"))?;

        let role: UserRole = header(parts, ACTOR_ROLE_HEADER)
            .ok_or_else(|| AppError::authentication("Missing X-Actor-Role header"))?
            .parse()
            .map_err(|e: AppError| AppError::authentication(e.message))?;

        Ok(ActorUser(RequestContext::new(
            user_id,
            role,
            client_ip(parts),
            user_agent(parts),
        )))
    }
}

impl<S> OptionalFromRequestParts<S> for ActorUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    /// Absent headers mean an anonymous caller; malformed ones are rejected.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if header(parts, ACTOR_ID_HEADER).is_none() {
            return Ok(None);
        }
        <Self as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn client_ip(parts: &Parts) -> Option<String> {
    header(parts, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
}

fn user_agent(parts: &Parts) -> Option<String> {
    header(parts, "user-agent").map(String::from)
}
