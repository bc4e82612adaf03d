//! Domain events emitted by AgentMart operations.
//!
//! Events are produced after a transition commits and dispatched to the
//! registered transition notifiers (audit log, tracing, slug cache).

pub mod listing;
pub mod maintenance;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use listing::ListingEvent;
pub use maintenance::MaintenanceEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event (if applicable).
    pub actor_id: Option<Uuid>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A listing lifecycle event.
    Listing(ListingEvent),
    /// A maintenance (consistency repair) event.
    Maintenance(MaintenanceEvent),
}

impl EventPayload {
    /// Audit action name, e.g. `"listing.approve"`.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Listing(e) => e.action(),
            Self::Maintenance(e) => e.action(),
        }
    }

    /// The listing the event is about.
    pub fn target_id(&self) -> Uuid {
        match self {
            Self::Listing(e) => e.listing_id(),
            Self::Maintenance(e) => e.listing_id(),
        }
    }
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Option<Uuid>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }

    /// Create a listing event caused by `actor_id`.
    pub fn listing(actor_id: Uuid, event: ListingEvent) -> Self {
        Self::new(Some(actor_id), EventPayload::Listing(event))
    }
}
