//! Notifier that records committed transitions in the audit log.

use async_trait::async_trait;

use agentmart_core::events::DomainEvent;
use agentmart_core::result::AppResult;
use agentmart_database::repositories::AuditLogRepository;
use agentmart_entity::audit::CreateAuditLogEntry;

use super::TransitionNotifier;

/// Audit target type for listing events.
pub const LISTING_TARGET: &str = "listing";

/// Writes one `audit_log` row per event.
#[derive(Debug, Clone)]
pub struct AuditNotifier {
    repo: AuditLogRepository,
}

impl AuditNotifier {
    /// Creates a new audit notifier.
    pub fn new(repo: AuditLogRepository) -> Self {
        Self { repo }
    }

    /// Build the row recorded for `event`.
    pub fn entry_for(event: &DomainEvent) -> AppResult<CreateAuditLogEntry> {
        Ok(CreateAuditLogEntry {
            actor_id: event.actor_id,
            action: event.payload.action().to_string(),
            target_type: LISTING_TARGET.to_string(),
            target_id: Some(event.payload.target_id()),
            details: Some(serde_json::to_value(&event.payload)?),
        })
    }
}

#[async_trait]
impl TransitionNotifier for AuditNotifier {
    fn name(&self) -> &'static str {
        "audit"
    }

    async fn notify(&self, event: &DomainEvent) -> AppResult<()> {
        let entry = Self::entry_for(event)?;
        self.repo.create(&entry).await?;
        Ok(())
    }
}
