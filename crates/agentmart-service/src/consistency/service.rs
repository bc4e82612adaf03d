//! Consistency scan and repair.
//!
//! Maintenance tooling only: the repair rewrites `has_active_update`
//! outside the normal transitions and is not meant to run alongside
//! seller or staff traffic.

use std::sync::Arc;

use tracing::{info, warn};

use agentmart_auth::{MarketPermission, RbacEnforcer};
use agentmart_core::error::AppError;
use agentmart_core::events::{DomainEvent, EventPayload, MaintenanceEvent};
use agentmart_core::traits::Service;
use agentmart_database::store::ListingStore;

use super::report::{ConsistencyIssue, ConsistencyReport, RepairSummary, classify_flag};
use crate::context::RequestContext;
use crate::notify::TransitionNotifier;

/// Detects and corrects drift in the denormalized listing flags.
#[derive(Debug, Clone)]
pub struct ConsistencyService {
    store: Arc<dyn ListingStore>,
    notifier: Arc<dyn TransitionNotifier>,
    rbac: Arc<RbacEnforcer>,
}

impl ConsistencyService {
    /// Creates a new consistency service.
    pub fn new(
        store: Arc<dyn ListingStore>,
        notifier: Arc<dyn TransitionNotifier>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            store,
            notifier,
            rbac,
        }
    }

    /// Reports every inconsistency without changing anything.
    pub async fn scan(&self, ctx: &RequestContext) -> Result<ConsistencyReport, AppError> {
        self.rbac
            .require_permission(&ctx.role, &MarketPermission::ConsistencyScan)?;

        let listings = self.store.find_all().await?;
        let report = ConsistencyReport::from_snapshot(&listings);
        info!(
            scanned = report.scanned,
            issues = report.issues.len(),
            "Consistency scan complete"
        );
        Ok(report)
    }

    /// Scans, then corrects every repairable finding.
    ///
    /// Each correction runs in its own transaction and re-checks the listing
    /// under lock; findings that no longer apply are skipped.
    pub async fn repair(&self, ctx: &RequestContext) -> Result<RepairSummary, AppError> {
        self.rbac
            .require_permission(&ctx.role, &MarketPermission::ConsistencyRepair)?;

        let report = self.scan(ctx).await?;
        let mut repaired = Vec::new();
        let mut skipped = Vec::new();

        for issue in report.repairable() {
            if self.repair_one(ctx, issue).await? {
                repaired.push(issue.clone());
            } else {
                skipped.push(issue.clone());
            }
        }

        for issue in report
            .issues
            .iter()
            .filter(|i| i.kind.corrected_flag().is_none())
        {
            warn!(
                listing_id = %issue.listing_id,
                issue = %issue.kind,
                detail = %issue.detail,
                "Consistency issue requires manual attention"
            );
        }

        info!(
            repaired = repaired.len(),
            skipped = skipped.len(),
            "Consistency repair complete"
        );
        Ok(RepairSummary {
            report,
            repaired,
            skipped,
        })
    }

    async fn repair_one(
        &self,
        ctx: &RequestContext,
        issue: &ConsistencyIssue,
    ) -> Result<bool, AppError> {
        let Some(flag) = issue.kind.corrected_flag() else {
            return Ok(false);
        };

        let mut tx = self.store.begin().await?;
        let Some(mut listing) = tx.lock(issue.listing_id).await? else {
            return Ok(false);
        };
        let pending = tx
            .children(listing.id)
            .await?
            .iter()
            .filter(|c| c.status.is_pending())
            .count();
        if classify_flag(&listing, pending) != Some(issue.kind) {
            return Ok(false);
        }

        listing.has_active_update = flag;
        tx.update(&listing).await?;
        tx.commit().await?;

        info!(
            listing_id = %listing.id,
            issue = %issue.kind,
            has_active_update = flag,
            "Listing flag repaired"
        );

        let event = DomainEvent::new(
            (!ctx.user_id.is_nil()).then_some(ctx.user_id),
            EventPayload::Maintenance(MaintenanceEvent::FlagRepaired {
                listing_id: listing.id,
                issue: issue.kind.code().to_string(),
                has_active_update: flag,
            }),
        );
        if let Err(e) = self.notifier.notify(&event).await {
            warn!(event_id = %event.id, error = %e, "Failed to dispatch repair event");
        }
        Ok(true)
    }
}

impl Service for ConsistencyService {}
