//! Authentication and authorization errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use crvs_core::ErrorBody;
use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingHeader,

    #[error("authorization header must use Bearer scheme")]
    InvalidScheme,

    #[error("token expired")]
    Expired,

    /// Signature, algorithm, issuer, audience or structure rejected.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("one of scopes [{required}] required")]
    MissingScope { required: String },

    /// The public key could not be loaded (500).
    #[error("verification key: {0}")]
    Key(String),
}

impl AuthError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingHeader | Self::InvalidScheme | Self::Expired | Self::InvalidToken(_) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
            }
            Self::MissingScope { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Key(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status_and_code().0
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidToken("bad signature".into()),
            ErrorKind::InvalidAlgorithm => Self::InvalidToken("algorithm not allowed".into()),
            ErrorKind::InvalidAudience => Self::InvalidToken("audience rejected".into()),
            ErrorKind::InvalidIssuer => Self::InvalidToken("issuer rejected".into()),
            ErrorKind::MissingRequiredClaim(claim) => {
                Self::InvalidToken(format!("missing claim {claim}"))
            }
            ErrorKind::ImmatureSignature => Self::InvalidToken("token not yet valid".into()),
            _ => Self::InvalidToken("malformed token".into()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            Self::Key(_) => {
                tracing::error!(error = %self, "token verifier misconfigured");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody::new(code, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failures_are_401() {
        for err in [
            AuthError::MissingHeader,
            AuthError::InvalidScheme,
            AuthError::Expired,
            AuthError::InvalidToken("x".into()),
        ] {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn missing_scope_is_403() {
        let err = AuthError::MissingScope {
            required: "natlsysadmin".into(),
        };
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert!(err.to_string().contains("natlsysadmin"));
    }

    #[test]
    fn jwt_errors_map_to_variants() {
        let expired: AuthError = jsonwebtoken::errors::Error::from(ErrorKind::ExpiredSignature).into();
        assert!(matches!(expired, AuthError::Expired));
        let alg: AuthError = jsonwebtoken::errors::Error::from(ErrorKind::InvalidAlgorithm).into();
        assert!(matches!(alg, AuthError::InvalidToken(m) if m.contains("algorithm")));
    }
}
