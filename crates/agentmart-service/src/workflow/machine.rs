//! Listing lifecycle transitions.
//!
//! Every transition runs in one store transaction. Rows are locked before
//! their preconditions are checked, so a check never races its write. When a
//! transition touches both a child and its parent, the child is locked first.
//! Events are dispatched only after commit.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use agentmart_core::events::{DomainEvent, ListingEvent};
use agentmart_database::store::{ListingStore, ListingTransaction};
use agentmart_entity::listing::slug::{archived_slug, slugify};
use agentmart_entity::listing::{Listing, ListingContent, ListingStatus};

use super::error::ReviewError;
use crate::notify::{NotifierSet, TransitionNotifier};

/// The version/review state machine.
///
/// Knows nothing about roles: callers decide who may act as staff. The only
/// authorization enforced here is listing ownership.
#[derive(Debug, Clone)]
pub struct ReviewWorkflow {
    /// Transactional listing storage.
    store: Arc<dyn ListingStore>,
    /// Post-commit event sink.
    notifier: Arc<dyn TransitionNotifier>,
}

impl ReviewWorkflow {
    /// Creates a new workflow over `store`.
    pub fn new(store: Arc<dyn ListingStore>, notifier: Arc<dyn TransitionNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Creates a workflow that dispatches no events.
    pub fn without_notifications(store: Arc<dyn ListingStore>) -> Self {
        Self::new(store, Arc::new(NotifierSet::new()))
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn ListingStore> {
        &self.store
    }

    /// Create a new original listing in DRAFT, owned by `owner_id`.
    ///
    /// The slug is derived from the title; a taken slug fails with a conflict.
    pub async fn create_draft(
        &self,
        owner_id: Uuid,
        content: ListingContent,
    ) -> Result<Listing, ReviewError> {
        let slug = slugify(&content.title).map_err(|e| ReviewError::Validation(e.message))?;
        let listing = Listing::new_draft(owner_id, slug, content);

        let mut tx = self.store.begin().await?;
        tx.insert(&listing).await?;
        tx.commit().await?;

        info!(
            listing_id = %listing.id,
            actor_id = %owner_id,
            slug = %listing.slug,
            "Listing draft created"
        );
        self.emit(
            owner_id,
            ListingEvent::Created {
                listing_id: listing.id,
                slug: listing.slug.clone(),
            },
        )
        .await;

        Ok(listing)
    }

    /// Replace the content of a DRAFT or REJECTED listing.
    pub async fn update_content(
        &self,
        listing_id: Uuid,
        actor_id: Uuid,
        content: ListingContent,
    ) -> Result<Listing, ReviewError> {
        let mut tx = self.store.begin().await?;
        let mut listing = lock_existing(tx.as_mut(), listing_id).await?;
        ensure_owner(&listing, actor_id)?;
        if !listing.status.is_editable() {
            return Err(invalid_state(&listing));
        }

        listing.content = content;
        tx.update(&listing).await?;
        tx.commit().await?;

        info!(listing_id = %listing_id, actor_id = %actor_id, "Listing content updated");
        self.emit(actor_id, ListingEvent::ContentUpdated { listing_id })
            .await;

        Ok(listing)
    }

    /// Move a DRAFT or REJECTED listing into review.
    ///
    /// Clears any previous rejection reason. Resubmitting a rejected update
    /// re-arms its parent's active-update flag, which requires the parent to
    /// still be live with no other pending update.
    pub async fn submit_for_review(
        &self,
        listing_id: Uuid,
        actor_id: Uuid,
    ) -> Result<Listing, ReviewError> {
        let mut tx = self.store.begin().await?;
        let mut listing = lock_existing(tx.as_mut(), listing_id).await?;
        ensure_owner(&listing, actor_id)?;
        if !listing.status.can_submit() {
            return Err(invalid_state(&listing));
        }

        let resubmission = listing.status == ListingStatus::Rejected;
        if resubmission {
            if let Some(parent_id) = listing.parent_id {
                let mut parent = lock_parent(tx.as_mut(), &listing, parent_id).await?;
                if !parent.is_public() {
                    return Err(ReviewError::Conflict(format!(
                        "Listing {parent_id} is no longer the live version"
                    )));
                }
                if parent.has_active_update {
                    return Err(ReviewError::Conflict(format!(
                        "Listing {parent_id} already has an active update"
                    )));
                }
                parent.has_active_update = true;
                tx.update(&parent).await?;
            }
        }

        listing.status = ListingStatus::UnderReview;
        listing.rejection_reason = None;
        listing.submitted_at = Some(Utc::now());
        tx.update(&listing).await?;
        tx.commit().await?;

        info!(
            listing_id = %listing_id,
            actor_id = %actor_id,
            version = listing.version,
            resubmission,
            "Listing submitted for review"
        );
        self.emit(
            actor_id,
            ListingEvent::SubmittedForReview {
                listing_id,
                version: listing.version,
                resubmission,
            },
        )
        .await;

        Ok(listing)
    }

    /// Spawn a pending update of a live listing.
    ///
    /// The child copies all content, starts in DRAFT under a draft slug, and
    /// takes the next free version number in the lineage.
    pub async fn request_update(
        &self,
        parent_id: Uuid,
        actor_id: Uuid,
    ) -> Result<Listing, ReviewError> {
        let mut tx = self.store.begin().await?;
        let mut parent = lock_existing(tx.as_mut(), parent_id).await?;
        ensure_owner(&parent, actor_id)?;
        if parent.status != ListingStatus::Approved {
            return Err(invalid_state(&parent));
        }
        if !parent.is_latest_version {
            return Err(ReviewError::Conflict(format!(
                "Listing {parent_id} is an archived version"
            )));
        }
        if parent.has_active_update {
            return Err(ReviewError::Conflict(format!(
                "Listing {parent_id} already has an active update"
            )));
        }

        let children = tx.children(parent_id).await?;
        if let Some(pending) = children.iter().find(|c| c.status.is_pending()) {
            warn!(
                listing_id = %parent_id,
                child_id = %pending.id,
                "Pending update exists without active-update flag"
            );
            return Err(ReviewError::Conflict(format!(
                "Listing {parent_id} already has a pending update {}",
                pending.id
            )));
        }

        // Skips version numbers still held by earlier rejected updates.
        let version = children
            .iter()
            .map(|c| c.version)
            .fold(parent.version, i32::max)
            + 1;
        let child = parent.spawn_update(version);
        tx.insert(&child).await?;

        parent.has_active_update = true;
        tx.update(&parent).await?;
        tx.commit().await?;

        info!(
            listing_id = %parent_id,
            child_id = %child.id,
            actor_id = %actor_id,
            version,
            slug = %child.slug,
            "Listing update requested"
        );
        self.emit(
            actor_id,
            ListingEvent::UpdateRequested {
                parent_id,
                child_id: child.id,
                version,
            },
        )
        .await;

        Ok(child)
    }

    /// Approve a listing under review.
    ///
    /// An original becomes the live version. An update is promoted: the
    /// parent is archived under `{slug}-v{version}-archived` and the child
    /// takes over the parent's slug, all in one transaction.
    pub async fn approve(
        &self,
        listing_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Listing, ReviewError> {
        let mut tx = self.store.begin().await?;
        let mut listing = lock_existing(tx.as_mut(), listing_id).await?;
        if !listing.status.can_review() {
            return Err(invalid_state(&listing));
        }

        let mut archived = None;
        if let Some(parent_id) = listing.parent_id {
            let mut parent = lock_parent(tx.as_mut(), &listing, parent_id).await?;
            if !parent.is_public() {
                warn!(
                    listing_id = %listing_id,
                    parent_id = %parent_id,
                    parent_status = %parent.status,
                    "Approval blocked: parent is not the live version"
                );
                return Err(ReviewError::Conflict(format!(
                    "Listing {parent_id} is no longer the live version"
                )));
            }

            // Archive first so the canonical slug is free for the child.
            let canonical = parent.slug.clone();
            parent.slug = archived_slug(&canonical, parent.version);
            parent.is_latest_version = false;
            parent.has_active_update = false;
            tx.update(&parent).await?;

            listing.slug = canonical;
            archived = Some((parent.id, parent.slug));
        }

        let now = Utc::now();
        listing.status = ListingStatus::Approved;
        listing.is_latest_version = true;
        listing.has_active_update = false;
        listing.rejection_reason = None;
        listing.reviewed_at = Some(now);
        listing.reviewed_by = Some(reviewer_id);
        tx.update(&listing).await?;
        tx.commit().await?;

        let (archived_id, archived_slug) = archived.unzip();
        info!(
            listing_id = %listing_id,
            actor_id = %reviewer_id,
            version = listing.version,
            slug = %listing.slug,
            archived_id = ?archived_id,
            "Listing approved"
        );
        self.emit(
            reviewer_id,
            ListingEvent::Approved {
                listing_id,
                slug: listing.slug.clone(),
                version: listing.version,
                archived_id,
                archived_slug,
            },
        )
        .await;

        Ok(listing)
    }

    /// Reject a listing under review with a reason.
    ///
    /// Rejecting an update also clears its parent's active-update flag so
    /// the owner may request a new one.
    pub async fn reject(
        &self,
        listing_id: Uuid,
        reviewer_id: Uuid,
        reason: &str,
    ) -> Result<Listing, ReviewError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ReviewError::Validation(
                "A rejection reason is required".to_string(),
            ));
        }

        let mut tx = self.store.begin().await?;
        let mut listing = lock_existing(tx.as_mut(), listing_id).await?;
        if !listing.status.can_review() {
            return Err(invalid_state(&listing));
        }

        let now = Utc::now();
        listing.status = ListingStatus::Rejected;
        listing.rejection_reason = Some(reason.to_string());
        listing.reviewed_at = Some(now);
        listing.reviewed_by = Some(reviewer_id);
        tx.update(&listing).await?;

        let mut cleared_parent = None;
        if let Some(parent_id) = listing.parent_id {
            match tx.lock(parent_id).await? {
                Some(mut parent) => {
                    parent.has_active_update = false;
                    tx.update(&parent).await?;
                    cleared_parent = Some(parent_id);
                }
                None => warn!(
                    listing_id = %listing_id,
                    parent_id = %parent_id,
                    "Rejected update references a missing parent"
                ),
            }
        }
        tx.commit().await?;

        info!(
            listing_id = %listing_id,
            actor_id = %reviewer_id,
            version = listing.version,
            parent_id = ?cleared_parent,
            "Listing rejected"
        );
        self.emit(
            reviewer_id,
            ListingEvent::Rejected {
                listing_id,
                reason: reason.to_string(),
                parent_id: cleared_parent,
            },
        )
        .await;

        Ok(listing)
    }

    async fn emit(&self, actor_id: Uuid, event: ListingEvent) {
        let event = DomainEvent::listing(actor_id, event);
        if let Err(e) = self.notifier.notify(&event).await {
            warn!(
                event_id = %event.id,
                action = event.payload.action(),
                error = %e,
                "Failed to dispatch listing event"
            );
        }
    }
}

async fn lock_existing(
    tx: &mut dyn ListingTransaction,
    listing_id: Uuid,
) -> Result<Listing, ReviewError> {
    tx.lock(listing_id)
        .await?
        .ok_or(ReviewError::NotFound(listing_id))
}

async fn lock_parent(
    tx: &mut dyn ListingTransaction,
    child: &Listing,
    parent_id: Uuid,
) -> Result<Listing, ReviewError> {
    tx.lock(parent_id).await?.ok_or_else(|| {
        ReviewError::Integrity(format!(
            "Listing {} references missing parent {parent_id}",
            child.id
        ))
    })
}

fn ensure_owner(listing: &Listing, actor_id: Uuid) -> Result<(), ReviewError> {
    if listing.is_owned_by(actor_id) {
        Ok(())
    } else {
        warn!(listing_id = %listing.id, actor_id = %actor_id, "Actor does not own listing");
        Err(ReviewError::NotOwner {
            listing_id: listing.id,
            actor_id,
        })
    }
}

fn invalid_state(listing: &Listing) -> ReviewError {
    warn!(
        listing_id = %listing.id,
        status = %listing.status,
        "Transition not allowed from current status"
    );
    ReviewError::InvalidState {
        listing_id: listing.id,
        current: listing.status,
    }
}
