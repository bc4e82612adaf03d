//! Seller and public endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{Actor, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["store"], true);
}

#[tokio::test]
async fn test_create_listing_starts_as_draft() {
    let app = TestApp::new();
    let listing = app.create_listing(Actor::seller(), "Invoice Bot").await;

    assert_eq!(listing["status"], "DRAFT");
    assert_eq!(listing["slug"], "invoice-bot");
    assert_eq!(listing["version"], 1);
    assert_eq!(listing["is_latest_version"], false);
    assert_eq!(listing["tags"], json!(["automation"]));
}

#[tokio::test]
async fn test_create_requires_actor_headers() {
    let app = TestApp::new();
    let response = app
        .request("POST", "/api/listings", Some(json!({ "title": "Invoice Bot" })), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_buyer_cannot_create() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/listings",
            Some(json!({ "title": "Invoice Bot" })),
            Some(Actor::new("buyer")),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_body_is_rejected() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/listings",
            Some(json!({ "title": "", "price_cents": -5 })),
            Some(Actor::seller()),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
    assert!(response.body["details"].get("price_cents").is_some());
}

#[tokio::test]
async fn test_title_with_version_slug_shape_is_rejected() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/listings",
            Some(json!({ "title": "Lead Scorer v2 draft", "price_cents": 0 })),
            Some(Actor::seller()),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_duplicate_title_conflicts() {
    let app = TestApp::new();
    app.create_listing(Actor::seller(), "Invoice Bot").await;

    let response = app
        .request(
            "POST",
            "/api/listings",
            Some(json!({ "title": "Invoice  Bot!" })),
            Some(Actor::seller()),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_draft_hidden_from_other_users() {
    let app = TestApp::new();
    let seller = Actor::seller();
    let listing = app.create_listing(seller, "Invoice Bot").await;
    let path = format!("/api/listings/{}", listing["id"].as_str().unwrap());

    let anonymous = app.request("GET", &path, None, None).await;
    assert_eq!(anonymous.status, StatusCode::NOT_FOUND);

    let stranger = app.request("GET", &path, None, Some(Actor::seller())).await;
    assert_eq!(stranger.status, StatusCode::NOT_FOUND);

    let owner = app.request("GET", &path, None, Some(seller)).await;
    assert_eq!(owner.status, StatusCode::OK);

    let staff = app.request("GET", &path, None, Some(Actor::staff())).await;
    assert_eq!(staff.status, StatusCode::OK);
}

#[tokio::test]
async fn test_edit_draft_keeps_slug() {
    let app = TestApp::new();
    let seller = Actor::seller();
    let listing = app.create_listing(seller, "Invoice Bot").await;
    let path = format!("/api/listings/{}", listing["id"].as_str().unwrap());

    let response = app
        .request(
            "PUT",
            &path,
            Some(json!({ "title": "Invoice Bot Pro", "price_cents": 2500 })),
            Some(seller),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["title"], "Invoice Bot Pro");
    assert_eq!(response.data()["slug"], "invoice-bot");
}

#[tokio::test]
async fn test_submit_by_non_owner_is_forbidden() {
    let app = TestApp::new();
    let listing = app.create_listing(Actor::seller(), "Invoice Bot").await;
    let path = format!("/api/listings/{}/submit", listing["id"].as_str().unwrap());

    let response = app.request("POST", &path, None, Some(Actor::seller())).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_double_submit_reports_current_status() {
    let app = TestApp::new();
    let seller = Actor::seller();
    let listing = app.create_listing(seller, "Invoice Bot").await;
    let path = format!("/api/listings/{}/submit", listing["id"].as_str().unwrap());

    app.post_ok(&path, seller).await;
    let response = app.request("POST", &path, None, Some(seller)).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "INVALID_STATE");
    assert_eq!(response.body["details"]["current_status"], "UNDER_REVIEW");
}

#[tokio::test]
async fn test_mine_lists_only_own_listings() {
    let app = TestApp::new();
    let seller = Actor::seller();
    app.create_listing(seller, "Invoice Bot").await;
    app.create_listing(seller, "Receipt Bot").await;
    app.create_listing(Actor::seller(), "Someone Else").await;

    let response = app.request("GET", "/api/listings/mine", None, Some(seller)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_public_slug_resolution() {
    let app = TestApp::new();
    let seller = Actor::seller();
    let staff = Actor::staff();
    let draft = app.create_listing(seller, "Draft Only").await;
    app.publish_listing(seller, staff, "Invoice Bot").await;

    let live = app.request("GET", "/api/agents/invoice-bot", None, None).await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.data()["status"], "APPROVED");
    assert_eq!(live.data()["is_latest_version"], true);

    let hidden = app
        .request("GET", &format!("/api/agents/{}", draft["slug"].as_str().unwrap()), None, None)
        .await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);

    let missing = app.request("GET", "/api/agents/nope", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_lifecycle_moves_slug_to_new_version() {
    let app = TestApp::new();
    let seller = Actor::seller();
    let staff = Actor::staff();
    let parent = app.publish_listing(seller, staff, "Invoice Bot").await;
    let parent_id = parent["id"].as_str().unwrap().to_string();

    // Warm the slug cache with the current version.
    let before = app.request("GET", "/api/agents/invoice-bot", None, None).await;
    assert_eq!(before.data()["id"], parent_id.as_str());

    let response = app
        .request(
            "POST",
            &format!("/api/listings/{parent_id}/updates"),
            None,
            Some(seller),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let child = response.data().clone();
    let child_id = child["id"].as_str().unwrap().to_string();
    assert_eq!(child["version"], 2);
    assert_eq!(child["status"], "DRAFT");
    assert_eq!(child["parent_id"], parent_id.as_str());

    let flagged = app
        .request("GET", &format!("/api/listings/{parent_id}"), None, None)
        .await;
    assert_eq!(flagged.data()["has_active_update"], true);

    app.post_ok(&format!("/api/listings/{child_id}/submit"), seller).await;
    let promoted = app
        .post_ok(&format!("/api/admin/listings/{child_id}/approve"), staff)
        .await;
    assert_eq!(promoted["slug"], "invoice-bot");
    assert_eq!(promoted["is_latest_version"], true);

    let after = app.request("GET", "/api/agents/invoice-bot", None, None).await;
    assert_eq!(after.data()["id"], child_id.as_str());

    // The archived version is no longer public.
    let archived = app
        .request("GET", "/api/agents/invoice-bot-v1-archived", None, None)
        .await;
    assert_eq!(archived.status, StatusCode::NOT_FOUND);

    let archived = app
        .request("GET", "/api/agents/invoice-bot-v1-archived", None, Some(seller))
        .await;
    assert_eq!(archived.status, StatusCode::OK);
    assert_eq!(archived.data()["id"], parent_id.as_str());
    assert_eq!(archived.data()["is_latest_version"], false);
    assert_eq!(archived.data()["has_active_update"], false);

    let lineage = app
        .request("GET", &format!("/api/listings/{child_id}/lineage"), None, Some(seller))
        .await;
    assert_eq!(lineage.status, StatusCode::OK);
    assert_eq!(lineage.data()["live_id"], child_id.as_str());
    assert_eq!(lineage.data()["versions"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_lineage_forbidden_for_strangers() {
    let app = TestApp::new();
    let parent = app
        .publish_listing(Actor::seller(), Actor::staff(), "Invoice Bot")
        .await;
    let path = format!("/api/listings/{}/lineage", parent["id"].as_str().unwrap());

    let response = app.request("GET", &path, None, Some(Actor::seller())).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_second_update_request_conflicts() {
    let app = TestApp::new();
    let seller = Actor::seller();
    let parent = app.publish_listing(seller, Actor::staff(), "Invoice Bot").await;
    let path = format!("/api/listings/{}/updates", parent["id"].as_str().unwrap());

    app.post_ok(&path, seller).await;
    let response = app.request("POST", &path, None, Some(seller)).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "CONFLICT");
}
