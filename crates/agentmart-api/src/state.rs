//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use agentmart_auth::RbacEnforcer;
use agentmart_core::config::AppConfig;
use agentmart_database::store::ListingStore;
use agentmart_service::{
    ConsistencyService, ListingService, NotifierSet, ReviewService, ReviewWorkflow, SlugResolver,
    TransitionNotifier,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// When the server started
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// Transactional listing store
    pub store: Arc<dyn ListingStore>,
    /// Cached slug resolution
    pub slug_resolver: Arc<SlugResolver>,

    // ── Auth ─────────────────────────────────────────────────
    /// Role-based permission checks
    pub rbac: Arc<RbacEnforcer>,

    // ── Services ─────────────────────────────────────────────
    /// Seller and public listing operations
    pub listing_service: Arc<ListingService>,
    /// Staff review decisions
    pub review_service: Arc<ReviewService>,
    /// Flag drift detection and repair
    pub consistency_service: Arc<ConsistencyService>,
}

impl AppState {
    /// Wires the services over `store`.
    ///
    /// The slug resolver is appended to `notifiers` so that promotions
    /// invalidate its cache.
    pub fn new(config: AppConfig, store: Arc<dyn ListingStore>, notifiers: NotifierSet) -> Self {
        let rbac = Arc::new(RbacEnforcer::new());
        let slug_resolver = Arc::new(SlugResolver::new(Arc::clone(&store), &config.cache));

        let notifier: Arc<dyn TransitionNotifier> = Arc::new(
            notifiers.with(Arc::clone(&slug_resolver) as Arc<dyn TransitionNotifier>),
        );

        let workflow = Arc::new(ReviewWorkflow::new(
            Arc::clone(&store),
            Arc::clone(&notifier),
        ));
        let listing_service = Arc::new(ListingService::new(
            Arc::clone(&workflow),
            Arc::clone(&slug_resolver),
            Arc::clone(&rbac),
        ));
        let review_service = Arc::new(ReviewService::new(
            Arc::clone(&workflow),
            Arc::clone(&rbac),
            config.review.clone(),
        ));
        let consistency_service = Arc::new(ConsistencyService::new(
            Arc::clone(&store),
            notifier,
            Arc::clone(&rbac),
        ));

        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            store,
            slug_resolver,
            rbac,
            listing_service,
            review_service,
            consistency_service,
        }
    }
}
