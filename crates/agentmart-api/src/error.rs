//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use agentmart_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Handler error. Wraps [`AppError`] so it can be rendered by Axum.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type returned by handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Status code and machine-readable code for an error kind.
    pub fn status_of(kind: ErrorKind) -> (StatusCode, &'static str) {
        match kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::InvalidState => (StatusCode::CONFLICT, "INVALID_STATE"),
            ErrorKind::Integrity => (StatusCode::INTERNAL_SERVER_ERROR, "INTEGRITY_ERROR"),
            ErrorKind::ServiceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let details = serde_json::to_value(errors.field_errors()).ok();
        let mut err = AppError::validation("Request validation failed");
        if let Some(details) = details {
            err = err.with_details(details);
        }
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = Self::status_of(err.kind);

        // Internal details stay in the log.
        let (message, details) = if status.is_server_error() {
            tracing::error!(kind = ?err.kind, error = %err, "Request failed");
            ("Internal server error".to_string(), None)
        } else {
            (err.message, err.details)
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}
