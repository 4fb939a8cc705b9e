//! # OpenAPI Document
//!
//! Assembles the utoipa-documented routes into one OpenAPI spec, served at
//! `/openapi.json`. The auth proxy is not documented: its contract belongs
//! to the auth service.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CRVS Gateway",
        version = "0.1.0",
        description = "Entry point to the civil registration platform: health checks, locations and facilities, and health-system event notifications.",
        license(name = "MPL-2.0")
    ),
    paths(
        crate::routes::health::check_health,
        crate::routes::health::metrics,
        crate::routes::location::search_locations,
        crate::routes::location::get_location,
        crate::routes::location::create_location,
        crate::routes::location::update_location,
        crate::routes::notification::create_notification,
    ),
    components(schemas(
        crate::routes::health::HealthStatus,
        crate::routes::health::ServiceHealth,
        crate::middleware::metrics::MetricsSnapshot,
        crate::routes::location::LocationCode,
        crate::routes::location::LocationStatistic,
        crate::routes::location::CreateLocationRequest,
        crate::routes::location::UpdateLocationRequest,
    )),
    tags(
        (name = "api", description = "Locations and event notifications"),
        (name = "health", description = "Service health and counters"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
