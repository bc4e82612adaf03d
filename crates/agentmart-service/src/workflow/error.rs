//! Error type for listing lifecycle transitions.
//!
//! Every failed transition maps to exactly one variant, and every variant
//! maps cleanly to `agentmart_core::error::AppError` at the service boundary.

use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use agentmart_core::error::{AppError, ErrorKind};
use agentmart_entity::listing::ListingStatus;

/// Outcome of a rejected lifecycle transition.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The actor does not own the listing.
    #[error("User {actor_id} does not own listing {listing_id}")]
    NotOwner {
        /// The listing acted upon.
        listing_id: Uuid,
        /// The acting user.
        actor_id: Uuid,
    },

    /// The transition is not allowed from the listing's current status.
    #[error("Listing {listing_id} is {current}; transition not allowed")]
    InvalidState {
        /// The listing acted upon.
        listing_id: Uuid,
        /// Status observed under lock.
        current: ListingStatus,
    },

    /// A related listing is in a state that blocks the transition.
    #[error("{0}")]
    Conflict(String),

    /// Stored data violates a structural invariant.
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// The listing does not exist.
    #[error("Listing {0} not found")]
    NotFound(Uuid),

    /// Caller input was rejected.
    #[error("{0}")]
    Validation(String),

    /// The store failed; the transaction was rolled back.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl ReviewError {
    /// The workspace error kind this outcome maps to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOwner { .. } => ErrorKind::Authorization,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Integrity(_) => ErrorKind::Integrity,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Store(e) => e.kind,
        }
    }
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Store(inner) => inner,
            ReviewError::InvalidState { current, .. } => {
                AppError::new(ErrorKind::InvalidState, err.to_string())
                    .with_details(json!({ "current_status": current }))
            }
            ReviewError::Integrity(ref message) => {
                error!(error = %message, "Listing integrity violation");
                AppError::integrity(err.to_string())
            }
            _ => AppError::new(err.kind(), err.to_string()),
        }
    }
}
