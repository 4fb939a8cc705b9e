//! RS256 token verification.

use std::collections::HashSet;
use std::path::Path;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::claims::{Claims, ISSUER};
use crate::error::AuthError;

/// Verifies platform tokens for one audience.
///
/// Only RS256 is accepted. `iss` and `aud` are mandatory; `exp` is enforced
/// with zero leeway when present.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
    audience: String,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("audience", &self.audience)
            .field("key", &"[public key]")
            .finish()
    }
}

impl TokenVerifier {
    /// Build a verifier from a PEM-encoded RSA public key.
    pub fn from_rsa_pem(pem: &[u8], audience: &str) -> Result<Self, AuthError> {
        let key = DecodingKey::from_rsa_pem(pem).map_err(|e| AuthError::Key(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[audience]);
        validation.required_spec_claims = HashSet::from(["iss".to_string(), "aud".to_string()]);

        Ok(Self {
            key,
            validation,
            audience: audience.to_string(),
        })
    }

    /// Build a verifier from a public key file.
    pub fn from_pem_file(path: &Path, audience: &str) -> Result<Self, AuthError> {
        let pem = std::fs::read(path)
            .map_err(|e| AuthError::Key(format!("{}: {e}", path.display())))?;
        let verifier = Self::from_rsa_pem(&pem, audience)?;
        tracing::info!(path = %path.display(), audience, "loaded token verification key");
        Ok(verifier)
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Verify `token` and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }
}
