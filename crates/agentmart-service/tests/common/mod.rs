//! Shared fixtures for service tests.

#![allow(dead_code)]

use std::sync::Arc;

use uuid::Uuid;

use agentmart_database::store::{ListingStore, MemoryListingStore};
use agentmart_entity::listing::{Listing, ListingContent, PricingModel};
use agentmart_service::ReviewWorkflow;

/// A workflow over a fresh in-memory store, plus a handle on the store.
pub fn setup() -> (ReviewWorkflow, MemoryListingStore) {
    let store = MemoryListingStore::new();
    let shared: Arc<dyn ListingStore> = Arc::new(store.clone());
    (ReviewWorkflow::without_notifications(shared), store)
}

pub fn content(title: &str) -> ListingContent {
    ListingContent {
        title: title.to_string(),
        description: "Summarizes support tickets".to_string(),
        category: Some("support".to_string()),
        tags: vec!["nlp".to_string(), "tickets".to_string()],
        price_cents: 2500,
        currency: "USD".to_string(),
        pricing_model: PricingModel::Subscription,
        workflow: serde_json::json!({ "steps": ["fetch", "summarize"] }),
    }
}

/// Scenario A: a freshly approved original listing.
pub async fn approved_listing(wf: &ReviewWorkflow, owner: Uuid, title: &str) -> Listing {
    let listing = wf.create_draft(owner, content(title)).await.unwrap();
    wf.submit_for_review(listing.id, owner).await.unwrap();
    wf.approve(listing.id, Uuid::new_v4()).await.unwrap()
}

/// Scenario B then submit: a live parent with its update under review.
pub async fn update_under_review(
    wf: &ReviewWorkflow,
    owner: Uuid,
    title: &str,
) -> (Listing, Listing) {
    let parent = approved_listing(wf, owner, title).await;
    let child = wf.request_update(parent.id, owner).await.unwrap();
    let child = wf.submit_for_review(child.id, owner).await.unwrap();
    (parent, child)
}

pub async fn reload(store: &MemoryListingStore, id: Uuid) -> Listing {
    store.find_by_id(id).await.unwrap().unwrap()
}

/// Every listing marked latest within the lineage rooted at `root_id`.
pub async fn latest_in_lineage(store: &MemoryListingStore, root_id: Uuid) -> Vec<Listing> {
    let mut latest = Vec::new();
    let mut frontier = vec![root_id];
    while let Some(id) = frontier.pop() {
        let listing = reload(store, id).await;
        if listing.is_latest_version {
            latest.push(listing);
        }
        for child in store.find_children(id).await.unwrap() {
            frontier.push(child.id);
        }
    }
    latest
}
