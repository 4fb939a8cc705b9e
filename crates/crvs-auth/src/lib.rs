//! # crvs-auth: Bearer Token Verification
//!
//! Every CRVS service trusts tokens minted by the auth service. Tokens are
//! RS256 JWTs signed with the auth service's private key; services hold the
//! public half and verify signature, issuer, audience and expiry locally.
//!
//! ## Modules
//!
//! | Module         | Contents |
//! |----------------|----------|
//! | [`claims`]     | Token claims and the issuer/audience constants |
//! | [`verifier`]   | [`TokenVerifier`]: key loading and validation |
//! | [`middleware`] | [`auth_middleware`], [`CallerIdentity`], [`require_scope`] |
//! | [`error`]      | [`AuthError`] and its 401/403 responses |
//!
//! ## Wiring
//!
//! ```text
//! Router
//!     .route(...)                         // protected routes
//!     .layer(from_fn(auth_middleware))    // verifies, inserts CallerIdentity
//!     .layer(Extension(Arc<TokenVerifier>))
//! ```
//!
//! Handlers take [`CallerIdentity`] as an extractor and call
//! [`require_scope`] with the scopes the route accepts.

pub mod claims;
pub mod error;
pub mod middleware;
pub mod verifier;

pub use claims::{Claims, GATEWAY_AUDIENCE, ISSUER, USER_MGNT_AUDIENCE};
pub use error::AuthError;
pub use middleware::{auth_middleware, require_scope, CallerIdentity};
pub use verifier::TokenVerifier;
