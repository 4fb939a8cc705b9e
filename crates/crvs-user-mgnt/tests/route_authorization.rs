//! Route authorization for the user-management service.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use crvs_auth::{TokenVerifier, GATEWAY_AUDIENCE, ISSUER, USER_MGNT_AUDIENCE};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

const PUBLIC_KEY: &str = include_str!("../../crvs-auth/tests/fixtures/cert.key.pub");
const PRIVATE_KEY: &str = include_str!("../../crvs-auth/tests/fixtures/cert.key");
const OTHER_PRIVATE_KEY: &str = include_str!("../../crvs-auth/tests/fixtures/cert-invalid.key");

fn app() -> axum::Router {
    let verifier = TokenVerifier::from_rsa_pem(PUBLIC_KEY.as_bytes(), USER_MGNT_AUDIENCE).unwrap();
    crvs_user_mgnt::app(verifier)
}

fn claims() -> Value {
    json!({
        "iss": ISSUER,
        "aud": USER_MGNT_AUDIENCE,
        "sub": "5d10885374be318fa7689f0b",
        "exp": chrono::Utc::now().timestamp() + 600,
        "scope": ["sysadmin"]
    })
}

fn sign_with(key: &str, alg: Algorithm, claims: &Value) -> String {
    let key = EncodingKey::from_rsa_pem(key.as_bytes()).unwrap();
    encode(&Header::new(alg), claims, &key).unwrap()
}

fn sign(claims: &Value) -> String {
    sign_with(PRIVATE_KEY, Algorithm::RS256, claims)
}

async fn check_token(authorization: Option<String>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri("/check-token");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let response = app()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn assert_unauthorized(token: String) {
    let (status, body) = check_token(Some(format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn ping_needs_no_token() {
    let response = app()
        .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn missing_token_rejected() {
    let (status, _) = check_token(None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_rejected() {
    assert_unauthorized("not.a.jwt".to_string()).await;
}

#[tokio::test]
async fn token_signed_with_other_key_rejected() {
    assert_unauthorized(sign_with(OTHER_PRIVATE_KEY, Algorithm::RS256, &claims())).await;
}

#[tokio::test]
async fn expired_token_rejected() {
    let mut expired = claims();
    expired["exp"] = json!(chrono::Utc::now().timestamp() - 10);
    assert_unauthorized(sign(&expired)).await;
}

#[tokio::test]
async fn rs384_token_rejected() {
    assert_unauthorized(sign_with(PRIVATE_KEY, Algorithm::RS384, &claims())).await;
}

#[tokio::test]
async fn wrong_audience_rejected() {
    let mut foreign = claims();
    foreign["aud"] = json!(GATEWAY_AUDIENCE);
    assert_unauthorized(sign(&foreign)).await;
}

#[tokio::test]
async fn wrong_issuer_rejected() {
    let mut foreign = claims();
    foreign["iss"] = json!("opencrvs:notification-service");
    assert_unauthorized(sign(&foreign)).await;
}

#[tokio::test]
async fn valid_token_accepted() {
    let (status, body) = check_token(Some(format!("Bearer {}", sign(&claims())))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "valid": true, "subject": "5d10885374be318fa7689f0b" })
    );
}
