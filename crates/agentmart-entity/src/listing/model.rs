//! Listing entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::pricing::PricingModel;
use super::slug;
use super::status::ListingStatus;

/// Seller-authored content of a listing.
///
/// Opaque to the review state machine; copied verbatim into every new version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ListingContent {
    /// Display title.
    pub title: String,
    /// Long-form description (markdown).
    pub description: String,
    /// Marketplace category.
    pub category: Option<String>,
    /// Search tags.
    pub tags: Vec<String>,
    /// Price in the smallest currency unit.
    pub price_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// How buyers pay.
    pub pricing_model: PricingModel,
    /// The agent workflow definition (JSON).
    pub workflow: serde_json::Value,
}

/// A versioned marketplace listing.
///
/// The original listing of a lineage has no `parent_id`; each pending update
/// points at the version it will supersede.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Listing {
    /// Unique, immutable listing identifier.
    pub id: Uuid,
    /// The listing this version supersedes.
    pub parent_id: Option<Uuid>,
    /// Seller who owns the lineage.
    pub owner_id: Uuid,
    /// Unique routing key.
    pub slug: String,
    /// Version number within the lineage, starting at 1.
    pub version: i32,
    /// Review status.
    pub status: ListingStatus,
    /// Whether this version currently serves live traffic.
    pub is_latest_version: bool,
    /// Whether a pending update exists (meaningful on APPROVED listings only).
    pub has_active_update: bool,
    /// Reason given by staff on the last rejection.
    pub rejection_reason: Option<String>,
    /// Seller content.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub content: ListingContent,
    /// When the listing last entered review.
    pub submitted_at: Option<DateTime<Utc>>,
    /// When the last staff decision was recorded.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Staff member who recorded the last decision.
    pub reviewed_by: Option<Uuid>,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Build a fresh original listing in DRAFT at version 1.
    pub fn new_draft(owner_id: Uuid, slug: String, content: ListingContent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            parent_id: None,
            owner_id,
            slug,
            version: 1,
            status: ListingStatus::Draft,
            is_latest_version: false,
            has_active_update: false,
            rejection_reason: None,
            content,
            submitted_at: None,
            reviewed_at: None,
            reviewed_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a pending update of this listing with the given version number.
    ///
    /// The child copies all content, starts in DRAFT, and carries a
    /// distinguishing draft slug until it is promoted.
    pub fn spawn_update(&self, version: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            parent_id: Some(self.id),
            owner_id: self.owner_id,
            slug: slug::draft_slug(&self.slug, version),
            version,
            status: ListingStatus::Draft,
            is_latest_version: false,
            has_active_update: false,
            rejection_reason: None,
            content: self.content.clone(),
            submitted_at: None,
            reviewed_at: None,
            reviewed_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this listing is a pending or promoted update of another listing.
    pub fn is_update(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Whether `user_id` owns this listing.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Whether the listing is the live, publicly visible version.
    pub fn is_public(&self) -> bool {
        self.status == ListingStatus::Approved && self.is_latest_version
    }

    /// Whether this listing is live and free to receive a new pending update.
    pub fn accepts_update(&self) -> bool {
        self.is_public() && !self.has_active_update
    }
}
