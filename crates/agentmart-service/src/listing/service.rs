//! Listing service: seller operations plus owner/staff/public reads.

use std::sync::Arc;

use uuid::Uuid;

use agentmart_auth::{Capability, MarketPermission, RbacEnforcer};
use agentmart_core::error::AppError;
use agentmart_core::traits::Service;
use agentmart_database::store::ListingStore;
use agentmart_entity::listing::{Listing, ListingContent};

use super::lineage::Lineage;
use crate::context::RequestContext;
use crate::slug::SlugResolver;
use crate::workflow::ReviewWorkflow;

/// Orchestrates seller-facing listing use cases.
#[derive(Debug, Clone)]
pub struct ListingService {
    /// Lifecycle state machine.
    workflow: Arc<ReviewWorkflow>,
    /// Listing storage (reads).
    store: Arc<dyn ListingStore>,
    /// Public slug lookup.
    resolver: Arc<SlugResolver>,
    /// Role checks.
    rbac: Arc<RbacEnforcer>,
}

impl ListingService {
    /// Creates a new listing service.
    pub fn new(
        workflow: Arc<ReviewWorkflow>,
        resolver: Arc<SlugResolver>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            store: Arc::clone(workflow.store()),
            workflow,
            resolver,
            rbac,
        }
    }

    /// Creates a new DRAFT listing owned by the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        content: ListingContent,
    ) -> Result<Listing, AppError> {
        self.rbac
            .require_permission(&ctx.role, &MarketPermission::ListingCreate)?;
        Ok(self.workflow.create_draft(ctx.user_id, content).await?)
    }

    /// Replaces the content of one of the caller's DRAFT or REJECTED listings.
    pub async fn edit(
        &self,
        ctx: &RequestContext,
        listing_id: Uuid,
        content: ListingContent,
    ) -> Result<Listing, AppError> {
        self.rbac
            .require_permission(&ctx.role, &MarketPermission::ListingSubmit)?;
        Ok(self
            .workflow
            .update_content(listing_id, ctx.user_id, content)
            .await?)
    }

    /// Submits one of the caller's listings for review.
    pub async fn submit(
        &self,
        ctx: &RequestContext,
        listing_id: Uuid,
    ) -> Result<Listing, AppError> {
        self.rbac
            .require_permission(&ctx.role, &MarketPermission::ListingSubmit)?;
        Ok(self
            .workflow
            .submit_for_review(listing_id, ctx.user_id)
            .await?)
    }

    /// Spawns a pending update of one of the caller's live listings.
    pub async fn request_update(
        &self,
        ctx: &RequestContext,
        listing_id: Uuid,
    ) -> Result<Listing, AppError> {
        self.rbac
            .require_permission(&ctx.role, &MarketPermission::ListingRequestUpdate)?;
        Ok(self
            .workflow
            .request_update(listing_id, ctx.user_id)
            .await?)
    }

    /// Gets a listing by ID.
    ///
    /// Owners and staff see any listing; everyone else only live ones.
    pub async fn get(&self, ctx: &RequestContext, listing_id: Uuid) -> Result<Listing, AppError> {
        let listing = self
            .store
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Listing {listing_id} not found")))?;
        Capability::authorize_read(ctx.user_id, ctx.role, &listing)?;
        Ok(listing)
    }

    /// Resolves a routing slug to the listing carrying it.
    pub async fn resolve_slug(
        &self,
        ctx: &RequestContext,
        slug: &str,
    ) -> Result<Listing, AppError> {
        let listing = self
            .resolver
            .resolve(slug)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Agent '{slug}' not found")))?;
        Capability::authorize_read(ctx.user_id, ctx.role, &listing)?;
        Ok(listing)
    }

    /// Lists every version of the lineage containing `listing_id`.
    pub async fn lineage(
        &self,
        ctx: &RequestContext,
        listing_id: Uuid,
    ) -> Result<Lineage, AppError> {
        let listing = self.get(ctx, listing_id).await?;
        match Capability::resolve(ctx.user_id, ctx.role, &listing) {
            Some(Capability::Owner | Capability::Staff) => {}
            _ => {
                return Err(AppError::authorization(
                    "Only the owner or staff may view version history",
                ));
            }
        }
        Lineage::load(self.store.as_ref(), listing).await
    }

    /// Lists the caller's own listings, newest first.
    pub async fn list_mine(&self, ctx: &RequestContext) -> Result<Vec<Listing>, AppError> {
        self.store.find_by_owner(ctx.user_id).await
    }
}

impl Service for ListingService {}
