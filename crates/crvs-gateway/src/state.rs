//! # Application State
//!
//! Shared state passed to route handlers via the `State` extractor. The
//! gateway keeps no records of its own: locations live in Hearth, records
//! in workflow. What is held here is configuration, the upstream clients,
//! the token verifier, and the in-process counters.

use std::sync::Arc;

use crvs_auth::TokenVerifier;

use crate::config::GatewayConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::middleware::rate_limit::RateLimiter;
use crate::upstream::{UpstreamClient, UpstreamError};

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub upstream: UpstreamClient,
    pub verifier: Arc<TokenVerifier>,
    pub limiter: RateLimiter,
    pub metrics: ApiMetrics,
}

impl AppState {
    /// Build state with the default 10-per-minute credential limiter.
    pub fn new(config: GatewayConfig, verifier: TokenVerifier) -> Result<Self, UpstreamError> {
        Ok(Self {
            upstream: UpstreamClient::new(&config)?,
            config: Arc::new(config),
            verifier: Arc::new(verifier),
            limiter: RateLimiter::default(),
            metrics: ApiMetrics::new(),
        })
    }
}
