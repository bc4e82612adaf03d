//! PostgreSQL listing store.
//!
//! Transactions run at READ COMMITTED; [`ListingTransaction::lock`] issues
//! `SELECT ... FOR UPDATE` so concurrent transitions on the same row are
//! serialized and each sees the other's committed status.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use agentmart_core::error::{AppError, ErrorKind};
use agentmart_core::result::AppResult;
use agentmart_core::types::{PageRequest, PageResponse};
use agentmart_entity::listing::{Listing, ListingStatus};

use super::{ListingStore, ListingTransaction};
use crate::repositories::ListingRepository;
use crate::repositories::listing::map_write_error;

/// Listing store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgListingStore {
    pool: PgPool,
    repo: ListingRepository,
}

impl PgListingStore {
    /// Create a new store over `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: ListingRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl ListingStore for PgListingStore {
    async fn begin(&self) -> AppResult<Box<dyn ListingTransaction>> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgListingTransaction { tx }))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>> {
        self.repo.find_by_id(id).await
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Listing>> {
        self.repo.find_by_slug(slug).await
    }

    async fn find_children(&self, parent_id: Uuid) -> AppResult<Vec<Listing>> {
        self.repo.find_children(parent_id).await
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Listing>> {
        self.repo.find_by_owner(owner_id).await
    }

    async fn find_by_status(
        &self,
        status: ListingStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Listing>> {
        self.repo.find_by_status(status, page).await
    }

    async fn find_all(&self) -> AppResult<Vec<Listing>> {
        self.repo.find_all().await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.repo.ping().await
    }
}

/// An open PostgreSQL transaction.
pub struct PgListingTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ListingTransaction for PgListingTransaction {
    async fn lock(&mut self, id: Uuid) -> AppResult<Option<Listing>> {
        sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock listing", e))
    }

    async fn children(&mut self, parent_id: Uuid) -> AppResult<Vec<Listing>> {
        sqlx::query_as::<_, Listing>(
            "SELECT * FROM listings WHERE parent_id = $1 ORDER BY version ASC",
        )
        .bind(parent_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read listing children", e)
        })
    }

    async fn insert(&mut self, listing: &Listing) -> AppResult<()> {
        let c = &listing.content;
        sqlx::query(
            "INSERT INTO listings (id, parent_id, owner_id, slug, version, status, \
             is_latest_version, has_active_update, rejection_reason, title, description, \
             category, tags, price_cents, currency, pricing_model, workflow, submitted_at, \
             reviewed_at, reviewed_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22)",
        )
        .bind(listing.id)
        .bind(listing.parent_id)
        .bind(listing.owner_id)
        .bind(&listing.slug)
        .bind(listing.version)
        .bind(listing.status)
        .bind(listing.is_latest_version)
        .bind(listing.has_active_update)
        .bind(&listing.rejection_reason)
        .bind(&c.title)
        .bind(&c.description)
        .bind(&c.category)
        .bind(&c.tags)
        .bind(c.price_cents)
        .bind(&c.currency)
        .bind(c.pricing_model)
        .bind(&c.workflow)
        .bind(listing.submitted_at)
        .bind(listing.reviewed_at)
        .bind(listing.reviewed_by)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_write_error(e, &listing.slug, "insert listing"))?;
        Ok(())
    }

    async fn update(&mut self, listing: &Listing) -> AppResult<()> {
        let c = &listing.content;
        let result = sqlx::query(
            "UPDATE listings SET slug = $2, status = $3, is_latest_version = $4, \
             has_active_update = $5, rejection_reason = $6, title = $7, description = $8, \
             category = $9, tags = $10, price_cents = $11, currency = $12, \
             pricing_model = $13, workflow = $14, submitted_at = $15, reviewed_at = $16, \
             reviewed_by = $17, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(listing.id)
        .bind(&listing.slug)
        .bind(listing.status)
        .bind(listing.is_latest_version)
        .bind(listing.has_active_update)
        .bind(&listing.rejection_reason)
        .bind(&c.title)
        .bind(&c.description)
        .bind(&c.category)
        .bind(&c.tags)
        .bind(c.price_cents)
        .bind(&c.currency)
        .bind(c.pricing_model)
        .bind(&c.workflow)
        .bind(listing.submitted_at)
        .bind(listing.reviewed_at)
        .bind(listing.reviewed_by)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_write_error(e, &listing.slug, "update listing"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Listing {} not found",
                listing.id
            )));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }
}
