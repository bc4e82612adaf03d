//! Maintenance events raised by the consistency repair tool.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Corrections applied outside the normal transition paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaintenanceEvent {
    /// A denormalized flag was rewritten by the repair tool.
    FlagRepaired {
        /// The corrected listing.
        listing_id: Uuid,
        /// Issue code, e.g. `"STALE_ACTIVE_UPDATE"`.
        issue: String,
        /// The value written to `has_active_update`.
        has_active_update: bool,
    },
}

impl MaintenanceEvent {
    /// Audit action name for this event.
    pub fn action(&self) -> &'static str {
        match self {
            Self::FlagRepaired { .. } => "listing.repair",
        }
    }

    /// The listing the event is about.
    pub fn listing_id(&self) -> Uuid {
        match self {
            Self::FlagRepaired { listing_id, .. } => *listing_id,
        }
    }
}
