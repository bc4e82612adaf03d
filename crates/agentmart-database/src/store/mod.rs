//! Transactional listing storage used by the review state machine.
//!
//! Every transition runs inside one [`ListingTransaction`]: rows are locked
//! with [`ListingTransaction::lock`] before their preconditions are checked,
//! and all writes become visible together on [`ListingTransaction::commit`].
//! Dropping a transaction without committing rolls it back.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use agentmart_core::result::AppResult;
use agentmart_core::types::{PageRequest, PageResponse};
use agentmart_entity::listing::{Listing, ListingStatus};

pub use memory::MemoryListingStore;
pub use postgres::PgListingStore;

/// Storage backend for listings.
///
/// Read methods run outside any transaction and see committed state only.
#[async_trait]
pub trait ListingStore: Send + Sync + fmt::Debug + 'static {
    /// Start a new transaction.
    async fn begin(&self) -> AppResult<Box<dyn ListingTransaction>>;

    /// Find a listing by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>>;

    /// Find a listing by its current slug.
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Listing>>;

    /// All listings whose `parent_id` is `parent_id`, ordered by version.
    async fn find_children(&self, parent_id: Uuid) -> AppResult<Vec<Listing>>;

    /// All listings owned by `owner_id`, newest first.
    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Listing>>;

    /// Listings in `status`, oldest submission first.
    async fn find_by_status(
        &self,
        status: ListingStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Listing>>;

    /// Every listing (used by the consistency scan).
    async fn find_all(&self) -> AppResult<Vec<Listing>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// A single atomic unit of work against the listing store.
#[async_trait]
pub trait ListingTransaction: Send {
    /// Read a listing and hold an exclusive lock on it until the transaction ends.
    async fn lock(&mut self, id: Uuid) -> AppResult<Option<Listing>>;

    /// Read the children of `parent_id` as seen by this transaction.
    async fn children(&mut self, parent_id: Uuid) -> AppResult<Vec<Listing>>;

    /// Insert a new listing. A duplicate slug fails with a conflict error.
    async fn insert(&mut self, listing: &Listing) -> AppResult<()>;

    /// Persist the mutable columns of an existing listing.
    async fn update(&mut self, listing: &Listing) -> AppResult<()>;

    /// Make every write of this transaction visible atomically.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}
