//! Review service: the staff side of the listing lifecycle.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use agentmart_auth::{MarketPermission, RbacEnforcer};
use agentmart_core::config::ReviewConfig;
use agentmart_core::error::AppError;
use agentmart_core::traits::Service;
use agentmart_core::types::{PageRequest, PageResponse};
use agentmart_database::store::ListingStore;
use agentmart_entity::listing::{Listing, ListingStatus};

use crate::context::RequestContext;
use crate::workflow::ReviewWorkflow;

/// Staff review queue and decisions.
#[derive(Debug, Clone)]
pub struct ReviewService {
    /// Lifecycle state machine.
    workflow: Arc<ReviewWorkflow>,
    /// Listing storage (reads).
    store: Arc<dyn ListingStore>,
    /// Role checks.
    rbac: Arc<RbacEnforcer>,
    /// Review policy.
    config: ReviewConfig,
}

impl ReviewService {
    /// Creates a new review service.
    pub fn new(
        workflow: Arc<ReviewWorkflow>,
        rbac: Arc<RbacEnforcer>,
        config: ReviewConfig,
    ) -> Self {
        Self {
            store: Arc::clone(workflow.store()),
            workflow,
            rbac,
            config,
        }
    }

    /// Listings waiting for a decision, oldest submission first.
    pub async fn queue(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> Result<PageResponse<Listing>, AppError> {
        self.rbac
            .require_permission(&ctx.role, &MarketPermission::ListingReview)?;
        self.store
            .find_by_status(ListingStatus::UnderReview, page)
            .await
    }

    /// Approves a listing under review.
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        listing_id: Uuid,
    ) -> Result<Listing, AppError> {
        self.rbac
            .require_permission(&ctx.role, &MarketPermission::ListingReview)?;
        self.ensure_not_self_review(ctx, listing_id).await?;
        Ok(self.workflow.approve(listing_id, ctx.user_id).await?)
    }

    /// Rejects a listing under review.
    pub async fn reject(
        &self,
        ctx: &RequestContext,
        listing_id: Uuid,
        reason: &str,
    ) -> Result<Listing, AppError> {
        self.rbac
            .require_permission(&ctx.role, &MarketPermission::ListingReview)?;

        let min = self.config.min_rejection_reason_len;
        if reason.trim().chars().count() < min {
            return Err(AppError::validation(format!(
                "Rejection reason must be at least {min} characters"
            )));
        }

        self.ensure_not_self_review(ctx, listing_id).await?;
        Ok(self
            .workflow
            .reject(listing_id, ctx.user_id, reason)
            .await?)
    }

    /// Staff may not decide on their own listings unless configured otherwise.
    async fn ensure_not_self_review(
        &self,
        ctx: &RequestContext,
        listing_id: Uuid,
    ) -> Result<(), AppError> {
        if self.config.allow_self_review {
            return Ok(());
        }
        // Ownership never changes, so reading outside the transition is safe.
        let owned = self
            .store
            .find_by_id(listing_id)
            .await?
            .is_some_and(|l| l.is_owned_by(ctx.user_id));
        if owned {
            warn!(listing_id = %listing_id, user_id = %ctx.user_id, "Self-review refused");
            return Err(AppError::authorization(
                "Staff may not review their own listings",
            ));
        }
        Ok(())
    }
}

impl Service for ReviewService {}
