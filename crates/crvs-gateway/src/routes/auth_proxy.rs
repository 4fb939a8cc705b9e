//! # Auth-Service Proxy
//!
//! `POST /auth/{suffix}` is forwarded to `AUTH_URL/{suffix}` with the body
//! untouched. The credential endpoints are rate-limited per account:
//!
//! | Path                            | Key                     |
//! |---------------------------------|-------------------------|
//! | `/auth/authenticate`            | `username`              |
//! | `/auth/authenticate-super-user` | `username`              |
//! | `/auth/verifyUser`              | `mobile`, else `email`  |

use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use crate::error::AppError;
use crate::middleware::rate_limit::KeyPath;
use crate::state::AppState;
use crate::upstream::ForwardedResponse;

const USERNAME: KeyPath = KeyPath::Field("username");
const MOBILE_OR_EMAIL: KeyPath = KeyPath::FirstOf(&["mobile", "email"]);

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/authenticate", post(authenticate))
        .route("/auth/authenticate-super-user", post(authenticate_super_user))
        .route("/auth/verifyUser", post(verify_user))
        .route("/auth/:suffix", post(forward))
}

async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    limited_forward(&state, "authenticate", USERNAME, &headers, body).await
}

async fn authenticate_super_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    limited_forward(&state, "authenticate-super-user", USERNAME, &headers, body).await
}

async fn verify_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    limited_forward(&state, "verifyUser", MOBILE_OR_EMAIL, &headers, body).await
}

/// Forward any other auth-service endpoint without limiting.
async fn forward(
    State(state): State<AppState>,
    Path(suffix): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let resp = state
        .upstream
        .auth()
        .forward(&suffix, content_type(&headers), body)
        .await?;
    Ok(relay(resp))
}

async fn limited_forward(
    state: &AppState,
    suffix: &str,
    key_path: KeyPath,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let key = key_path.key_from_payload(&body);
    if !state.limiter.check(suffix, &key) {
        return Err(AppError::RateLimited);
    }
    let resp = state
        .upstream
        .auth()
        .forward(suffix, content_type(headers), body)
        .await?;
    Ok(relay(resp))
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}

/// Turn an upstream response into ours, status and content type included.
fn relay(resp: ForwardedResponse) -> Response {
    let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = (status, Body::from(resp.body)).into_response();
    if let Some(ct) = resp
        .content_type
        .and_then(|ct| header::HeaderValue::from_str(&ct).ok())
    {
        response.headers_mut().insert(header::CONTENT_TYPE, ct);
    }
    response
}
