//! In-memory listing store.
//!
//! Transactions hold the store-wide lock for their whole lifetime, so they
//! are fully serialized. Writes are staged and applied on commit; a dropped
//! transaction leaves the committed map untouched.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

use agentmart_core::error::AppError;
use agentmart_core::result::AppResult;
use agentmart_core::types::{PageRequest, PageResponse};
use agentmart_entity::listing::{Listing, ListingStatus};

use super::{ListingStore, ListingTransaction};

#[derive(Debug, Default)]
struct MemoryState {
    listings: HashMap<Uuid, Listing>,
    /// Remaining writes before an injected failure fires.
    fail_countdown: Option<usize>,
}

/// Listing store held entirely in process memory.
///
/// Used by tests and local development. Enforces slug uniqueness like the
/// PostgreSQL schema does.
#[derive(Debug, Clone, Default)]
pub struct MemoryListingStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryListingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th write (1-based) from now on fail with a database error.
    ///
    /// The failure fires once and is then disarmed.
    pub async fn fail_on_write(&self, n: usize) {
        self.state.lock().await.fail_countdown = Some(n.max(1));
    }

    /// Insert rows as-is, bypassing every check. Intended for fixtures that
    /// need to reproduce corrupted data.
    pub async fn seed(&self, listings: impl IntoIterator<Item = Listing>) {
        let mut state = self.state.lock().await;
        for listing in listings {
            state.listings.insert(listing.id, listing);
        }
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn begin(&self) -> AppResult<Box<dyn ListingTransaction>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        Ok(Box::new(MemoryTransaction {
            guard,
            staged: HashMap::new(),
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>> {
        Ok(self.state.lock().await.listings.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Listing>> {
        let state = self.state.lock().await;
        Ok(state.listings.values().find(|l| l.slug == slug).cloned())
    }

    async fn find_children(&self, parent_id: Uuid) -> AppResult<Vec<Listing>> {
        let state = self.state.lock().await;
        let mut children: Vec<Listing> = state
            .listings
            .values()
            .filter(|l| l.parent_id == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by_key(|l| l.version);
        Ok(children)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Listing>> {
        let state = self.state.lock().await;
        let mut owned: Vec<Listing> = state
            .listings
            .values()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_by_status(
        &self,
        status: ListingStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Listing>> {
        let state = self.state.lock().await;
        let mut matching: Vec<Listing> = state
            .listings
            .values()
            .filter(|l| l.status == status)
            .cloned()
            .collect();
        // NULLS LAST, matching the SQL ordering.
        matching.sort_by_key(|l| (l.submitted_at.is_none(), l.submitted_at, l.created_at));
        Ok(PageResponse::from_vec(matching, page))
    }

    async fn find_all(&self) -> AppResult<Vec<Listing>> {
        let state = self.state.lock().await;
        let mut all: Vec<Listing> = state.listings.values().cloned().collect();
        all.sort_by_key(|l| l.created_at);
        Ok(all)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    staged: HashMap<Uuid, Listing>,
}

impl MemoryTransaction {
    fn get(&self, id: Uuid) -> Option<&Listing> {
        self.staged.get(&id).or_else(|| self.guard.listings.get(&id))
    }

    /// Committed rows overlaid with this transaction's staged writes.
    fn view(&self) -> impl Iterator<Item = &Listing> {
        self.guard
            .listings
            .values()
            .filter(|l| !self.staged.contains_key(&l.id))
            .chain(self.staged.values())
    }

    fn check_injected_failure(&mut self) -> AppResult<()> {
        match self.guard.fail_countdown {
            Some(n) if n <= 1 => {
                self.guard.fail_countdown = None;
                debug!("Injected write failure fired");
                Err(AppError::database("Injected write failure"))
            }
            Some(n) => {
                self.guard.fail_countdown = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn check_slug_free(&self, listing: &Listing) -> AppResult<()> {
        if self
            .view()
            .any(|l| l.slug == listing.slug && l.id != listing.id)
        {
            return Err(AppError::conflict(format!(
                "Slug '{}' is already in use",
                listing.slug
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ListingTransaction for MemoryTransaction {
    async fn lock(&mut self, id: Uuid) -> AppResult<Option<Listing>> {
        Ok(self.get(id).cloned())
    }

    async fn children(&mut self, parent_id: Uuid) -> AppResult<Vec<Listing>> {
        let mut children: Vec<Listing> = self
            .view()
            .filter(|l| l.parent_id == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by_key(|l| l.version);
        Ok(children)
    }

    async fn insert(&mut self, listing: &Listing) -> AppResult<()> {
        self.check_injected_failure()?;
        if self.get(listing.id).is_some() {
            return Err(AppError::conflict(format!(
                "Listing {} already exists",
                listing.id
            )));
        }
        self.check_slug_free(listing)?;
        self.staged.insert(listing.id, listing.clone());
        Ok(())
    }

    async fn update(&mut self, listing: &Listing) -> AppResult<()> {
        self.check_injected_failure()?;
        if self.get(listing.id).is_none() {
            return Err(AppError::not_found(format!(
                "Listing {} not found",
                listing.id
            )));
        }
        self.check_slug_free(listing)?;
        let mut row = listing.clone();
        row.updated_at = Utc::now();
        self.staged.insert(row.id, row);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTransaction { mut guard, staged } = *self;
        guard.listings.extend(staged);
        Ok(())
    }
}
