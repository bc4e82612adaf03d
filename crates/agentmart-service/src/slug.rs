//! Slug to listing resolution with a moka cache in front of the store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;
use uuid::Uuid;

use agentmart_core::config::CacheConfig;
use agentmart_core::events::{DomainEvent, EventPayload, ListingEvent};
use agentmart_core::result::AppResult;
use agentmart_database::store::ListingStore;
use agentmart_entity::listing::Listing;

use crate::notify::TransitionNotifier;

/// Resolves routing slugs to listings.
///
/// Caches `slug -> id` only; the row itself is always re-read, and a cached
/// id whose row no longer carries the slug is treated as a miss. Entries for
/// both slugs touched by a promotion are dropped once the promotion commits.
#[derive(Debug, Clone)]
pub struct SlugResolver {
    store: Arc<dyn ListingStore>,
    cache: Cache<String, Uuid>,
}

impl SlugResolver {
    /// Creates a new resolver from configuration.
    pub fn new(store: Arc<dyn ListingStore>, config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.slug_max_capacity)
            .time_to_live(Duration::from_secs(config.slug_ttl_seconds))
            .build();
        Self { store, cache }
    }

    /// Find the listing currently carrying `slug`.
    pub async fn resolve(&self, slug: &str) -> AppResult<Option<Listing>> {
        if let Some(id) = self.cache.get(slug).await {
            if let Some(listing) = self.store.find_by_id(id).await? {
                if listing.slug == slug {
                    return Ok(Some(listing));
                }
            }
            debug!(slug = %slug, "Stale slug cache entry");
            self.cache.invalidate(slug).await;
        }

        let found = self.store.find_by_slug(slug).await?;
        if let Some(listing) = &found {
            self.cache.insert(slug.to_string(), listing.id).await;
        }
        Ok(found)
    }

    /// Drop the cached entry for `slug`.
    pub async fn invalidate(&self, slug: &str) {
        self.cache.invalidate(slug).await;
    }

    /// Number of cached entries (approximate).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl TransitionNotifier for SlugResolver {
    fn name(&self) -> &'static str {
        "slug-cache"
    }

    async fn notify(&self, event: &DomainEvent) -> AppResult<()> {
        if let EventPayload::Listing(ListingEvent::Approved {
            slug,
            archived_slug,
            ..
        }) = &event.payload
        {
            self.invalidate(slug).await;
            if let Some(archived) = archived_slug {
                self.invalidate(archived).await;
            }
            debug!(slug = %slug, "Slug cache invalidated after promotion");
        }
        Ok(())
    }
}
