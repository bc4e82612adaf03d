//! Listing and review services: authorization, policy checks, and reads.

mod common;

use std::sync::Arc;

use uuid::Uuid;

use agentmart_auth::RbacEnforcer;
use agentmart_core::config::{CacheConfig, ReviewConfig};
use agentmart_core::error::ErrorKind;
use agentmart_core::types::PageRequest;
use agentmart_database::store::{ListingStore, MemoryListingStore};
use agentmart_entity::listing::ListingStatus;
use agentmart_entity::user::UserRole;
use agentmart_service::notify::NotifierSet;
use agentmart_service::{
    ListingService, RequestContext, ReviewService, ReviewWorkflow, SlugResolver,
};

use common::content;

struct Fixture {
    listings: ListingService,
    reviews: ReviewService,
}

fn fixture(config: ReviewConfig) -> Fixture {
    let store: Arc<dyn ListingStore> = Arc::new(MemoryListingStore::new());
    let resolver = Arc::new(SlugResolver::new(Arc::clone(&store), &CacheConfig::default()));
    let notifier = NotifierSet::new().with(resolver.clone());
    let workflow = Arc::new(ReviewWorkflow::new(store, Arc::new(notifier)));
    let rbac = Arc::new(RbacEnforcer::new());
    Fixture {
        listings: ListingService::new(Arc::clone(&workflow), resolver, Arc::clone(&rbac)),
        reviews: ReviewService::new(workflow, rbac, config),
    }
}

fn actor(role: UserRole) -> RequestContext {
    RequestContext::new(Uuid::new_v4(), role, None, None)
}

#[tokio::test]
async fn test_buyer_cannot_create_listing() {
    let f = fixture(ReviewConfig::default());
    let err = f
        .listings
        .create(&actor(UserRole::Buyer), content("Lead Scorer"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_seller_cannot_approve() {
    let f = fixture(ReviewConfig::default());
    let seller = actor(UserRole::Seller);
    let listing = f.listings.create(&seller, content("Lead Scorer")).await.unwrap();
    f.listings.submit(&seller, listing.id).await.unwrap();

    let err = f.reviews.approve(&seller, listing.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_short_rejection_reason_is_refused() {
    let f = fixture(ReviewConfig::default());
    let seller = actor(UserRole::Seller);
    let staff = actor(UserRole::Staff);
    let listing = f.listings.create(&seller, content("Lead Scorer")).await.unwrap();
    f.listings.submit(&seller, listing.id).await.unwrap();

    let err = f.reviews.reject(&staff, listing.id, "too short").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let rejected = f
        .reviews
        .reject(&staff, listing.id, "needs more detail")
        .await
        .unwrap();
    assert_eq!(rejected.status, ListingStatus::Rejected);
}

#[tokio::test]
async fn test_invalid_state_surfaces_current_status() {
    let f = fixture(ReviewConfig::default());
    let seller = actor(UserRole::Seller);
    let staff = actor(UserRole::Staff);
    let listing = f.listings.create(&seller, content("Lead Scorer")).await.unwrap();

    let err = f.reviews.approve(&staff, listing.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
    assert_eq!(err.details.unwrap()["current_status"], "DRAFT");
}

#[tokio::test]
async fn test_self_review_is_refused_unless_allowed() {
    let admin = actor(UserRole::Admin);

    let f = fixture(ReviewConfig::default());
    let listing = f.listings.create(&admin, content("Lead Scorer")).await.unwrap();
    f.listings.submit(&admin, listing.id).await.unwrap();
    let err = f.reviews.approve(&admin, listing.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let f = fixture(ReviewConfig {
        allow_self_review: true,
        ..ReviewConfig::default()
    });
    let listing = f.listings.create(&admin, content("Lead Scorer")).await.unwrap();
    f.listings.submit(&admin, listing.id).await.unwrap();
    assert!(f.reviews.approve(&admin, listing.id).await.is_ok());
}

#[tokio::test]
async fn test_review_queue_orders_by_submission() {
    let f = fixture(ReviewConfig::default());
    let seller = actor(UserRole::Seller);
    let staff = actor(UserRole::Staff);

    let mut submitted = Vec::new();
    for title in ["First Agent", "Second Agent", "Third Agent"] {
        let listing = f.listings.create(&seller, content(title)).await.unwrap();
        f.listings.submit(&seller, listing.id).await.unwrap();
        submitted.push(listing.id);
    }
    f.listings.create(&seller, content("Unsubmitted")).await.unwrap();

    let page = f.reviews.queue(&staff, &PageRequest::new(1, 2)).await.unwrap();
    assert_eq!(page.total_items, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, submitted[0]);
    assert_eq!(page.items[1].id, submitted[1]);
    assert!(page.has_next);
}

#[tokio::test]
async fn test_visibility_of_unreleased_listings() {
    let f = fixture(ReviewConfig::default());
    let seller = actor(UserRole::Seller);
    let listing = f.listings.create(&seller, content("Lead Scorer")).await.unwrap();

    assert!(f.listings.get(&seller, listing.id).await.is_ok());
    assert!(f.listings.get(&actor(UserRole::Staff), listing.id).await.is_ok());

    let err = f
        .listings
        .get(&actor(UserRole::Buyer), listing.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_slug_follows_promotion() {
    let f = fixture(ReviewConfig::default());
    let seller = actor(UserRole::Seller);
    let staff = actor(UserRole::Staff);
    let buyer = actor(UserRole::Buyer);

    let v1 = f.listings.create(&seller, content("Lead Scorer")).await.unwrap();
    f.listings.submit(&seller, v1.id).await.unwrap();
    f.reviews.approve(&staff, v1.id).await.unwrap();

    // Warm the cache with the original version.
    let resolved = f.listings.resolve_slug(&buyer, "lead-scorer").await.unwrap();
    assert_eq!(resolved.id, v1.id);

    let v2 = f.listings.request_update(&seller, v1.id).await.unwrap();
    f.listings.submit(&seller, v2.id).await.unwrap();
    f.reviews.approve(&staff, v2.id).await.unwrap();

    let resolved = f.listings.resolve_slug(&buyer, "lead-scorer").await.unwrap();
    assert_eq!(resolved.id, v2.id);
    assert_eq!(resolved.version, 2);

    // Archived versions remain addressable by their owner only.
    let err = f
        .listings
        .resolve_slug(&buyer, "lead-scorer-v1-archived")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let archived = f
        .listings
        .resolve_slug(&seller, "lead-scorer-v1-archived")
        .await
        .unwrap();
    assert_eq!(archived.id, v1.id);
}

#[tokio::test]
async fn test_lineage_lists_every_version() {
    let f = fixture(ReviewConfig::default());
    let seller = actor(UserRole::Seller);
    let staff = actor(UserRole::Staff);

    let v1 = f.listings.create(&seller, content("Lead Scorer")).await.unwrap();
    f.listings.submit(&seller, v1.id).await.unwrap();
    f.reviews.approve(&staff, v1.id).await.unwrap();
    let v2 = f.listings.request_update(&seller, v1.id).await.unwrap();
    f.listings.submit(&seller, v2.id).await.unwrap();
    f.reviews.approve(&staff, v2.id).await.unwrap();
    let v3 = f.listings.request_update(&seller, v2.id).await.unwrap();

    let lineage = f.listings.lineage(&seller, v3.id).await.unwrap();
    assert_eq!(lineage.root_id, v1.id);
    assert_eq!(lineage.live_id, Some(v2.id));
    let versions: Vec<_> = lineage.versions.iter().map(|l| l.version).collect();
    assert_eq!(versions, vec![1, 2, 3]);

    let err = f
        .listings
        .lineage(&actor(UserRole::Buyer), v2.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_list_mine_only_returns_own_listings() {
    let f = fixture(ReviewConfig::default());
    let seller = actor(UserRole::Seller);
    let other = actor(UserRole::Seller);
    f.listings.create(&seller, content("Mine One")).await.unwrap();
    f.listings.create(&seller, content("Mine Two")).await.unwrap();
    f.listings.create(&other, content("Theirs")).await.unwrap();

    let mine = f.listings.list_mine(&seller).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|l| l.owner_id == seller.user_id));
}
