//! Listing lifecycle events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events raised by the version/review state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ListingEvent {
    /// A new original listing was created in DRAFT.
    Created {
        /// The listing ID.
        listing_id: Uuid,
        /// The listing slug.
        slug: String,
    },
    /// Content of a DRAFT or REJECTED listing was edited.
    ContentUpdated {
        /// The listing ID.
        listing_id: Uuid,
    },
    /// A listing entered review.
    SubmittedForReview {
        /// The listing ID.
        listing_id: Uuid,
        /// The listing version.
        version: i32,
        /// Whether the listing had previously been rejected.
        resubmission: bool,
    },
    /// A pending update was spawned against a live listing.
    UpdateRequested {
        /// The live (parent) listing.
        parent_id: Uuid,
        /// The new child listing.
        child_id: Uuid,
        /// The child's version number.
        version: i32,
    },
    /// A listing was approved; for updates, the parent was archived.
    Approved {
        /// The approved listing.
        listing_id: Uuid,
        /// The canonical slug now served by this listing.
        slug: String,
        /// The approved version.
        version: i32,
        /// The archived parent, when an update was promoted.
        archived_id: Option<Uuid>,
        /// The parent's slug after archival.
        archived_slug: Option<String>,
    },
    /// A listing was rejected.
    Rejected {
        /// The rejected listing.
        listing_id: Uuid,
        /// The reviewer's reason.
        reason: String,
        /// The parent whose active-update flag was cleared, if any.
        parent_id: Option<Uuid>,
    },
}

impl ListingEvent {
    /// Audit action name for this event.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Created { .. } => "listing.create",
            Self::ContentUpdated { .. } => "listing.update_content",
            Self::SubmittedForReview { .. } => "listing.submit",
            Self::UpdateRequested { .. } => "listing.request_update",
            Self::Approved { .. } => "listing.approve",
            Self::Rejected { .. } => "listing.reject",
        }
    }

    /// The listing the event is primarily about.
    pub fn listing_id(&self) -> Uuid {
        match self {
            Self::Created { listing_id, .. }
            | Self::ContentUpdated { listing_id }
            | Self::SubmittedForReview { listing_id, .. }
            | Self::Approved { listing_id, .. }
            | Self::Rejected { listing_id, .. } => *listing_id,
            Self::UpdateRequested { child_id, .. } => *child_id,
        }
    }
}
