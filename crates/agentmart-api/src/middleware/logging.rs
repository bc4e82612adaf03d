//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

use crate::extractors::actor::ACTOR_ID_HEADER;

/// Logs request method, path, acting user, status, and duration.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let actor = request
        .headers()
        .get(ACTOR_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            actor = %actor,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "HTTP request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            actor = %actor,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "HTTP request"
        );
    }

    response
}
