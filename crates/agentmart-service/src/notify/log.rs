//! Notifier that writes every committed transition to the tracing output.

use async_trait::async_trait;
use tracing::info;

use agentmart_core::events::DomainEvent;
use agentmart_core::result::AppResult;

use super::TransitionNotifier;

/// Emits one structured `info` line per event.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

#[async_trait]
impl TransitionNotifier for TracingNotifier {
    fn name(&self) -> &'static str {
        "tracing"
    }

    async fn notify(&self, event: &DomainEvent) -> AppResult<()> {
        let payload = serde_json::to_string(&event.payload)?;
        info!(
            target: "agentmart::events",
            event_id = %event.id,
            action = event.payload.action(),
            listing_id = %event.payload.target_id(),
            actor_id = ?event.actor_id,
            payload = %payload,
            "Domain event"
        );
        Ok(())
    }
}
