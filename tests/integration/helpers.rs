//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use agentmart_api::AppState;
use agentmart_core::config::AppConfig;
use agentmart_database::store::{ListingStore, MemoryListingStore};
use agentmart_service::NotifierSet;

/// A caller identity as forwarded by the gateway.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub role: &'static str,
}

impl Actor {
    pub fn new(role: &'static str) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
        }
    }

    pub fn seller() -> Self {
        Self::new("seller")
    }

    pub fn staff() -> Self {
        Self::new("staff")
    }

    pub fn admin() -> Self {
        Self::new("admin")
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store, for fixtures that bypass the API
    pub store: MemoryListingStore,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new test application with the given configuration
    pub fn with_config(config: AppConfig) -> Self {
        let store = MemoryListingStore::new();
        let shared: Arc<dyn ListingStore> = Arc::new(store.clone());
        let state = AppState::new(config.clone(), shared, NotifierSet::new());
        let router = agentmart_api::build_app(state, &config.server.cors);
        Self { router, store }
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        actor: Option<Actor>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(actor) = actor {
            req = req
                .header("X-Actor-Id", actor.id.to_string())
                .header("X-Actor-Role", actor.role);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create a draft listing and return its JSON
    pub async fn create_listing(&self, seller: Actor, title: &str) -> Value {
        let response = self
            .request(
                "POST",
                "/api/listings",
                Some(serde_json::json!({
                    "title": title,
                    "description": "Automates the boring parts.",
                    "tags": ["Automation"],
                    "price_cents": 1500,
                    "pricing_model": "one_time",
                })),
                Some(seller),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.data().clone()
    }

    /// Create, submit, and approve a listing; returns the approved JSON
    pub async fn publish_listing(&self, seller: Actor, staff: Actor, title: &str) -> Value {
        let id = self.create_listing(seller, title).await["id"].as_str().map(String::from);
        let id = id.expect("listing id");
        self.post_ok(&format!("/api/listings/{id}/submit"), seller).await;
        self.post_ok(&format!("/api/admin/listings/{id}/approve"), staff)
            .await
    }

    /// POST without a body and expect 2xx; returns `data`
    pub async fn post_ok(&self, path: &str, actor: Actor) -> Value {
        let response = self.request("POST", path, None, Some(actor)).await;
        assert!(
            response.status.is_success(),
            "POST {path} failed with {}: {:?}",
            response.status,
            response.body
        );
        response.data().clone()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The machine-readable `error` code of an error body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
