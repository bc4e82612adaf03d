//! Request context carrying the acting user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agentmart_entity::user::UserRole;

/// Context for the current request.
///
/// Built by the HTTP layer (or the CLI) and passed into service methods so
/// that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: Uuid,
    /// The acting user's role, as asserted by the gateway.
    pub role: UserRole,
    /// IP address of the request origin.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: Uuid,
        role: UserRole,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            user_id,
            role,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// Context for maintenance tooling run outside any HTTP request.
    pub fn system(role: UserRole) -> Self {
        Self::new(Uuid::nil(), role, None, Some("agentmart-cli".to_string()))
    }

    /// Returns whether the acting user is platform staff (or an admin).
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}
