//! # crvs-gateway: Platform Gateway
//!
//! The single HTTP entry point of the civil registration platform. It
//! checks bearer tokens and payloads, then hands requests to the services
//! behind it.
//!
//! ## Routes
//!
//! | Method | Path                      | Auth                           |
//! |--------|---------------------------|--------------------------------|
//! | GET    | `/tokenTest`              | any valid token                |
//! | GET    | `/ping`                   | none                           |
//! | GET    | `/metrics`                | none                           |
//! | GET    | `/openapi.json`           | none                           |
//! | GET    | `/location`               | none                           |
//! | GET    | `/location/:locationId`   | none                           |
//! | POST   | `/location`               | `natlsysadmin`                 |
//! | PUT    | `/location/:locationId`   | `natlsysadmin`                 |
//! | POST   | `/notification`           | `declare` or `notification-api`|
//! | POST   | `/auth/:suffix`           | none, some routes rate-limited |
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → MetricsLayer → (per-route) AuthLayer
//!
//! ## Crate Policy
//!
//! - Holds no records: locations live in Hearth, records in workflow.
//! - Mapping of form answers to FHIR lives in `crvs-forms`.
//! - All errors map to structured HTTP responses via [`AppError`].

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod upstream;

pub use config::{ConfigError, GatewayConfig, LogFormat};
pub use error::AppError;
pub use state::AppState;

use axum::middleware::from_fn;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

/// Assemble the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::token_test_router())
        .merge(routes::health::router())
        .merge(routes::location::router())
        .merge(routes::notification::router())
        .merge(routes::auth_proxy::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state.verifier.clone()))
        .layer(Extension(state.metrics.clone()))
        .with_state(state)
}
