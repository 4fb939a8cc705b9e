//! `POST /notification`: health-system event notifications.
//!
//! The body is validated as a FHIR document bundle before it is passed to
//! workflow under the caller's own token.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::post;
use axum::{extract::State, Json, Router};
use crvs_auth::{auth_middleware, require_scope, CallerIdentity};
use crvs_core::Scope;
use crvs_forms::fhir::Bundle;
use serde_json::Value;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notification", post(create_notification))
        .route_layer(from_fn(auth_middleware))
}

/// POST /notification: Create a health event notification.
#[utoipa::path(
    post,
    path = "/notification",
    request_body = Object,
    responses(
        (status = 200, description = "Workflow accepted the notification"),
        (status = 400, description = "Body is not a FHIR document bundle"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "declare or notification-api scope required"),
        (status = 502, description = "Workflow unavailable"),
    ),
    tag = "api"
)]
pub async fn create_notification(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_scope(&caller, &[Scope::Declare, Scope::NotificationApi])?;
    let payload = extract_json(body)?;

    let bundle = match Bundle::from_document(payload.clone()) {
        Ok(bundle) => bundle,
        Err(err) => {
            tracing::warn!(error = %err, "rejected event notification");
            return Err(err.into());
        }
    };
    tracing::debug!(entries = bundle.entry.len(), "event notification validated");

    let (status, response) = state
        .upstream
        .workflow()
        .event_notification(&payload, &caller.bearer())
        .await?;
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(response)))
}
