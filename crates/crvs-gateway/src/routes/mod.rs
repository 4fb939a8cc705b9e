//! # Route Modules
//!
//! Each module defines an Axum Router for one surface of the gateway.
//! Routers are assembled in [`crate::app`].

pub mod auth_proxy;
pub mod health;
pub mod location;
pub mod notification;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use crvs_auth::auth_middleware;

use crate::state::AppState;

/// `GET /tokenTest`: answers `success` for any verified token.
pub fn token_test_router() -> Router<AppState> {
    Router::new()
        .route("/tokenTest", get(token_test))
        .route_layer(from_fn(auth_middleware))
}

async fn token_test() -> &'static str {
    "success"
}
