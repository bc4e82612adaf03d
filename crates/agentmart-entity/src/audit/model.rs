//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable audit log entry recording a listing transition.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// The user who performed the action (`None` for maintenance tooling).
    pub actor_id: Option<Uuid>,
    /// The action that was performed (e.g., `"listing.approve"`).
    pub action: String,
    /// The type of target resource (e.g., `"listing"`).
    pub target_type: String,
    /// The target resource ID.
    pub target_id: Option<Uuid>,
    /// Additional details about the action (JSON).
    pub details: Option<serde_json::Value>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    /// The user who performed the action.
    pub actor_id: Option<Uuid>,
    /// The action performed.
    pub action: String,
    /// Target resource type.
    pub target_type: String,
    /// Target resource ID.
    pub target_id: Option<Uuid>,
    /// Additional details.
    pub details: Option<serde_json::Value>,
}
