//! Staff review and maintenance endpoints.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use agentmart_core::config::AppConfig;
use agentmart_database::store::ListingStore;

use crate::helpers::{Actor, TestApp};

async fn submitted(app: &TestApp, seller: Actor, title: &str) -> String {
    let listing = app.create_listing(seller, title).await;
    let id = listing["id"].as_str().unwrap().to_string();
    app.post_ok(&format!("/api/listings/{id}/submit"), seller).await;
    id
}

#[tokio::test]
async fn test_queue_requires_staff() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/api/admin/reviews", None, Some(Actor::seller()))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_queue_lists_submissions_oldest_first() {
    let app = TestApp::new();
    let seller = Actor::seller();
    let first = submitted(&app, seller, "First Bot").await;
    let second = submitted(&app, seller, "Second Bot").await;
    app.create_listing(seller, "Unsubmitted Bot").await;

    let response = app
        .request("GET", "/api/admin/reviews?page=1&per_page=10", None, Some(Actor::staff()))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let items = response.data()["items"].as_array().cloned().unwrap_or_default();
    let ids: Vec<&str> = items.iter().filter_map(|l| l["id"].as_str()).collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
    assert_eq!(response.data()["total_items"], 2);
}

#[tokio::test]
async fn test_reject_then_resubmit_clears_reason() {
    let app = TestApp::new();
    let seller = Actor::seller();
    let staff = Actor::staff();
    let id = submitted(&app, seller, "Invoice Bot").await;

    let short = app
        .request(
            "POST",
            &format!("/api/admin/listings/{id}/reject"),
            Some(json!({ "reason": "meh" })),
            Some(staff),
        )
        .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);

    let rejected = app
        .request(
            "POST",
            &format!("/api/admin/listings/{id}/reject"),
            Some(json!({ "reason": "Missing pricing details" })),
            Some(staff),
        )
        .await;
    assert_eq!(rejected.status, StatusCode::OK);
    assert_eq!(rejected.data()["status"], "REJECTED");
    assert_eq!(rejected.data()["rejection_reason"], "Missing pricing details");

    let resubmitted = app
        .post_ok(&format!("/api/listings/{id}/submit"), seller)
        .await;
    assert_eq!(resubmitted["status"], "UNDER_REVIEW");
    assert!(resubmitted["rejection_reason"].is_null());
}

#[tokio::test]
async fn test_rejecting_update_clears_parent_flag() {
    let app = TestApp::new();
    let seller = Actor::seller();
    let staff = Actor::staff();
    let parent = app.publish_listing(seller, staff, "Invoice Bot").await;
    let parent_id = parent["id"].as_str().unwrap().to_string();

    let child = app
        .post_ok(&format!("/api/listings/{parent_id}/updates"), seller)
        .await;
    let child_id = child["id"].as_str().unwrap().to_string();
    app.post_ok(&format!("/api/listings/{child_id}/submit"), seller).await;

    let response = app
        .request(
            "POST",
            &format!("/api/admin/listings/{child_id}/reject"),
            Some(json!({ "reason": "Screenshots are outdated" })),
            Some(staff),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let parent = app
        .request("GET", &format!("/api/listings/{parent_id}"), None, None)
        .await;
    assert_eq!(parent.data()["status"], "APPROVED");
    assert_eq!(parent.data()["is_latest_version"], true);
    assert_eq!(parent.data()["has_active_update"], false);
    assert_eq!(parent.data()["slug"], "invoice-bot");
}

#[tokio::test]
async fn test_second_approval_is_invalid_state() {
    let app = TestApp::new();
    let staff = Actor::staff();
    let id = submitted(&app, Actor::seller(), "Invoice Bot").await;
    let path = format!("/api/admin/listings/{id}/approve");

    app.post_ok(&path, staff).await;
    let response = app.request("POST", &path, None, Some(Actor::staff())).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "INVALID_STATE");
    assert_eq!(response.body["details"]["current_status"], "APPROVED");
}

#[tokio::test]
async fn test_approving_unknown_listing_is_not_found() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            &format!("/api/admin/listings/{}/approve", Uuid::new_v4()),
            None,
            Some(Actor::staff()),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_staff_cannot_review_own_listing() {
    let app = TestApp::new();
    let staff = Actor::staff();
    let id = submitted(&app, Actor { id: staff.id, role: "admin" }, "House Bot").await;

    let response = app
        .request("POST", &format!("/api/admin/listings/{id}/approve"), None, Some(staff))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_self_review_allowed_by_config() {
    let mut config = AppConfig::default();
    config.review.allow_self_review = true;
    let app = TestApp::with_config(config);
    let admin = Actor::admin();
    let id = submitted(&app, admin, "House Bot").await;

    let approved = app
        .post_ok(&format!("/api/admin/listings/{id}/approve"), admin)
        .await;
    assert_eq!(approved["status"], "APPROVED");
}

#[tokio::test]
async fn test_consistency_scan_and_repair() {
    let app = TestApp::new();
    let seller = Actor::seller();
    let staff = Actor::staff();
    let live = app.publish_listing(seller, staff, "Invoice Bot").await;
    let live_id: Uuid = live["id"].as_str().unwrap().parse().unwrap();

    let clean = app
        .request("GET", "/api/admin/consistency", None, Some(staff))
        .await;
    assert_eq!(clean.status, StatusCode::OK);
    assert_eq!(clean.data()["issues"], json!([]));

    // Flag a pending update that does not exist.
    let mut drifted = app.store.find_by_id(live_id).await.unwrap().unwrap();
    drifted.has_active_update = true;
    app.store.seed([drifted]).await;

    let scan = app
        .request("GET", "/api/admin/consistency", None, Some(staff))
        .await;
    assert_eq!(scan.data()["issues"][0]["kind"], "STALE_ACTIVE_UPDATE");

    let forbidden = app
        .request("POST", "/api/admin/consistency/repair", None, Some(staff))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let repaired = app
        .post_ok("/api/admin/consistency/repair", Actor::admin())
        .await;
    assert_eq!(repaired["repaired"].as_array().map(Vec::len), Some(1));

    let listing = app.store.find_by_id(live_id).await.unwrap().unwrap();
    assert!(!listing.has_active_update);
}
