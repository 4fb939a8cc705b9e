//! Token claims.

use crvs_core::Scope;
use serde::{Deserialize, Serialize};

/// Issuer of every token the platform accepts.
pub const ISSUER: &str = "opencrvs:auth-service";

/// Audience of tokens presented to the user management service.
pub const USER_MGNT_AUDIENCE: &str = "opencrvs:user-mgnt-user";

/// Audience of tokens presented to the gateway.
pub const GATEWAY_AUDIENCE: &str = "opencrvs:gateway-user";

/// Claims of a platform token.
///
/// `iss` and `aud` are checked by the verifier before these are read, so
/// only the claims handlers use are modelled. `aud` may be a string or a
/// list on the wire and is therefore kept raw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    /// Permission strings. Unknown strings are kept but never match a [`Scope`].
    #[serde(default)]
    pub scope: Vec<String>,
}

impl Claims {
    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scope.iter().any(|s| s == scope.as_str())
    }

    /// The recognised scopes, in token order.
    pub fn scopes(&self) -> Vec<Scope> {
        self.scope.iter().filter_map(|s| Scope::parse(s)).collect()
    }
}
