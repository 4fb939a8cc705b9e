//! # Gateway Error Type
//!
//! [`AppError`] implements `IntoResponse`, mapping failures to status codes
//! and the shared `{"error": {...}}` body. Upstream and internal messages
//! are logged and replaced with a generic message in the response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use crvs_auth::AuthError;
use crvs_core::{ErrorBody, ValidationError};
use thiserror::Error;

use crate::upstream::UpstreamError;

#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Payload, query or path failed validation (400).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication or authorization failure (401/403).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Conflict with an existing resource (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Per-key rate limit exceeded (429).
    #[error("rate limit exceeded")]
    RateLimited,

    /// An upstream service failed (502). Message is logged, not returned.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Internal server error (500). Message is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Auth(err) if err.status() == StatusCode::FORBIDDEN => {
                (StatusCode::FORBIDDEN, "FORBIDDEN")
            }
            Self::Auth(err) if err.status() == StatusCode::UNAUTHORIZED => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
            }
            Self::Auth(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Auth(err) = self {
            return err.into_response();
        }

        let (status, code) = self.status_and_code();
        let message = match &self {
            Self::Upstream(_) => {
                tracing::error!(error = %self, "upstream service error");
                "An upstream service is unavailable".to_string()
            }
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody::new(code, message))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        Self::Upstream(err.to_string())
    }
}
