//! Listing review status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review status of a listing.
///
/// `DRAFT -> UNDER_REVIEW -> APPROVED | REJECTED`, with `REJECTED -> UNDER_REVIEW`
/// on resubmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "listing_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    /// Being edited by its owner.
    Draft,
    /// Waiting for a staff decision.
    UnderReview,
    /// Accepted by staff.
    Approved,
    /// Declined by staff; may be edited and resubmitted.
    Rejected,
}

impl ListingStatus {
    /// Whether the listing may enter review from this status.
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Draft | Self::Rejected)
    }

    /// Whether a staff decision may be recorded from this status.
    pub fn can_review(&self) -> bool {
        matches!(self, Self::UnderReview)
    }

    /// Whether the owner may edit content in this status.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Rejected)
    }

    /// Whether a child in this status counts as a pending update.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Draft | Self::UnderReview)
    }

    /// Return the status in its canonical upper-case form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = agentmart_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DRAFT" => Ok(Self::Draft),
            "UNDER_REVIEW" => Ok(Self::UnderReview),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(agentmart_core::AppError::validation(format!(
                "Invalid listing status: '{s}'. Expected one of: DRAFT, UNDER_REVIEW, APPROVED, REJECTED"
            ))),
        }
    }
}
