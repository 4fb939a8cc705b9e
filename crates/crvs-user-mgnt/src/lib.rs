//! # crvs-user-mgnt: User Management Service
//!
//! The HTTP surface of the user-management service. Every route except
//! `/ping` requires an RS256 bearer token issued by the auth service for
//! the `opencrvs:user-mgnt-user` audience.
//!
//! | Method | Path           | Auth |
//! |--------|----------------|------|
//! | GET    | `/ping`        | none |
//! | GET    | `/check-token` | JWT  |

pub mod config;

use std::sync::Arc;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Extension, Json, Router};
use crvs_auth::{auth_middleware, CallerIdentity, TokenVerifier};
use serde_json::{json, Value};

pub use config::{ConfigError, UserMgntConfig};

/// Assemble the service router around a verifier for user-mgnt tokens.
pub fn app(verifier: TokenVerifier) -> Router {
    let protected = Router::new()
        .route("/check-token", get(check_token))
        .route_layer(from_fn(auth_middleware));

    Router::new()
        .route("/ping", get(ping))
        .merge(protected)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(Extension(Arc::new(verifier)))
}

async fn ping() -> Json<Value> {
    Json(json!({ "success": true }))
}

async fn check_token(caller: CallerIdentity) -> Json<Value> {
    Json(json!({ "valid": true, "subject": caller.subject }))
}
