//! # Bearer Middleware and Caller Identity
//!
//! [`auth_middleware`] reads the `Authorization: Bearer <jwt>` header,
//! verifies it with the [`TokenVerifier`] found in request extensions, and
//! inserts a [`CallerIdentity`] for handlers. Failures short-circuit with a
//! 401 [`AuthError`] response.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use crvs_core::Scope;

use crate::error::AuthError;
use crate::verifier::TokenVerifier;

/// The verified caller of a request.
#[derive(Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// `sub` claim: the user or client id.
    pub subject: Option<String>,
    pub scopes: Vec<Scope>,
    /// The raw bearer token, for forwarding to upstream services.
    pub token: String,
}

impl std::fmt::Debug for CallerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallerIdentity")
            .field("subject", &self.subject)
            .field("scopes", &self.scopes)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl CallerIdentity {
    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }

    /// `Authorization` header value carrying the caller's token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or(AuthError::MissingHeader)
    }
}

/// Require any one of `accepted`. Returns 403 otherwise.
pub fn require_scope(caller: &CallerIdentity, accepted: &[Scope]) -> Result<(), AuthError> {
    if accepted.iter().any(|s| caller.has_scope(*s)) {
        return Ok(());
    }
    let required = accepted
        .iter()
        .map(Scope::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    tracing::warn!(subject = ?caller.subject, %required, "caller lacks required scope");
    Err(AuthError::MissingScope { required })
}

fn bearer_token(request: &Request) -> Result<&str, AuthError> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidScheme)?;
    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AuthError::InvalidScheme),
    }
}

/// Verify the bearer token and attach the caller's identity.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let Some(verifier) = request.extensions().get::<Arc<TokenVerifier>>().cloned() else {
        return AuthError::Key("no token verifier configured".into()).into_response();
    };

    let identity = match bearer_token(&request).and_then(|token| {
        verifier.verify(token).map(|claims| CallerIdentity {
            subject: claims.sub.clone(),
            scopes: claims.scopes(),
            token: token.to_string(),
        })
    }) {
        Ok(identity) => identity,
        Err(err) => {
            tracing::warn!(reason = %err, "authentication failed");
            return err.into_response();
        }
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}
