//! Post-commit transition notifiers.
//!
//! Notifiers run after a transition has committed. Their failures are
//! logged and never undo the transition.

pub mod audit;
pub mod log;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::warn;

use agentmart_core::events::DomainEvent;
use agentmart_core::result::AppResult;

pub use audit::AuditNotifier;
pub use log::TracingNotifier;

/// Receives domain events for committed transitions.
#[async_trait]
pub trait TransitionNotifier: Send + Sync + fmt::Debug + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Handle one committed event.
    async fn notify(&self, event: &DomainEvent) -> AppResult<()>;
}

/// Fans each event out to every registered notifier concurrently.
#[derive(Debug, Clone, Default)]
pub struct NotifierSet {
    notifiers: Vec<Arc<dyn TransitionNotifier>>,
}

impl NotifierSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a notifier.
    pub fn with(mut self, notifier: Arc<dyn TransitionNotifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    /// Number of registered notifiers.
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Whether no notifier is registered.
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

#[async_trait]
impl TransitionNotifier for NotifierSet {
    fn name(&self) -> &'static str {
        "set"
    }

    async fn notify(&self, event: &DomainEvent) -> AppResult<()> {
        let results = join_all(self.notifiers.iter().map(|n| n.notify(event))).await;
        for (notifier, result) in self.notifiers.iter().zip(results) {
            if let Err(e) = result {
                warn!(
                    notifier = notifier.name(),
                    event_id = %event.id,
                    action = event.payload.action(),
                    error = %e,
                    "Transition notifier failed"
                );
            }
        }
        Ok(())
    }
}
