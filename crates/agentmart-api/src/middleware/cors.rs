//! CORS layer configuration.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};

use agentmart_core::config::CorsConfig;

use crate::extractors::actor::{ACTOR_ID_HEADER, ACTOR_ROLE_HEADER};

/// Builds a CORS tower layer from configuration.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    // Origins
    if config.allowed_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    // Methods
    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    // Headers
    layer = layer.allow_headers([
        header::CONTENT_TYPE,
        HeaderName::from_static(ACTOR_ID_HEADER),
        HeaderName::from_static(ACTOR_ROLE_HEADER),
    ]);

    layer.max_age(Duration::from_secs(config.max_age_seconds))
}
