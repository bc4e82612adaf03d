//! Listing repository: read-side queries over committed state.

use sqlx::PgPool;
use uuid::Uuid;

use agentmart_core::error::{AppError, ErrorKind};
use agentmart_core::result::AppResult;
use agentmart_core::types::pagination::{PageRequest, PageResponse};
use agentmart_entity::listing::{Listing, ListingStatus};

/// Name of the unique constraint on `listings.slug`.
pub(crate) const SLUG_CONSTRAINT: &str = "listings_slug_key";

/// Repository for listing reads.
#[derive(Debug, Clone)]
pub struct ListingRepository {
    pool: PgPool,
}

impl ListingRepository {
    /// Create a new listing repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a listing by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>> {
        sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find listing", e))
    }

    /// Find a listing by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Listing>> {
        sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find listing by slug", e)
            })
    }

    /// Find the direct children of a listing.
    pub async fn find_children(&self, parent_id: Uuid) -> AppResult<Vec<Listing>> {
        sqlx::query_as::<_, Listing>(
            "SELECT * FROM listings WHERE parent_id = $1 ORDER BY version ASC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find listing children", e)
        })
    }

    /// Find all listings owned by a seller.
    pub async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Listing>> {
        sqlx::query_as::<_, Listing>(
            "SELECT * FROM listings WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find listings by owner", e)
        })
    }

    /// Find listings in a status, oldest submission first.
    pub async fn find_by_status(
        &self,
        status: ListingStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Listing>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count listings", e)
            })?;

        let items = sqlx::query_as::<_, Listing>(
            "SELECT * FROM listings WHERE status = $1 \
             ORDER BY submitted_at ASC NULLS LAST, created_at ASC \
             LIMIT $2 OFFSET $3",
        )
        .bind(status)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list listings by status", e)
        })?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Load every listing.
    pub async fn find_all(&self) -> AppResult<Vec<Listing>> {
        sqlx::query_as::<_, Listing>("SELECT * FROM listings ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load listings", e))
    }

    /// Check database connectivity.
    pub async fn ping(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}

/// Map a write failure, turning a slug collision into a conflict.
pub(crate) fn map_write_error(err: sqlx::Error, slug: &str, action: &str) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(SLUG_CONSTRAINT) => {
            AppError::conflict(format!("Slug '{slug}' is already in use"))
        }
        e => AppError::with_source(ErrorKind::Database, format!("Failed to {action}"), e),
    }
}
