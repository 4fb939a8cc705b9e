//! # Upstream Service Clients
//!
//! Typed HTTP clients for the services behind the gateway. All share one
//! pooled `reqwest::Client` with the configured timeout.
//!
//! | Client               | Service        | Used by |
//! |----------------------|----------------|---------|
//! | [`HearthClient`]     | FHIR store     | `/location` routes |
//! | [`WorkflowClient`]   | workflow       | `/notification` |
//! | [`AuthServiceClient`]| auth           | `/auth/*` proxy |
//! | [`UpstreamClient::ping`] | any service | `/ping` |
//!
//! Reads are retried when the upstream is unreachable or times out; writes
//! are sent once.

pub mod auth;
pub mod hearth;
pub(crate) mod retry;
pub mod workflow;

use std::time::Duration;

use url::Url;

use crate::config::GatewayConfig;

pub use auth::{AuthServiceClient, ForwardedResponse};
pub use hearth::HearthClient;
pub use workflow::WorkflowClient;

/// Errors from upstream calls.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Transport failure.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Non-2xx status where success was required.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body was not the expected JSON.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
}

/// Join `path` onto `base`, keeping any path prefix of `base` (`/fhir`).
pub(crate) fn endpoint_url(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Turn a non-success response into [`UpstreamError::Status`].
pub(crate) async fn ensure_success(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, UpstreamError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(UpstreamError::Status {
        endpoint: endpoint.to_string(),
        status,
        body,
    })
}

/// All upstream clients.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    hearth: HearthClient,
    workflow: WorkflowClient,
    auth: AuthServiceClient,
}

impl UpstreamClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            hearth: HearthClient::new(http.clone(), config.hearth_url.clone()),
            workflow: WorkflowClient::new(http.clone(), config.workflow_url.clone()),
            auth: AuthServiceClient::new(http.clone(), config.auth_url.clone()),
            http,
        })
    }

    pub fn hearth(&self) -> &HearthClient {
        &self.hearth
    }

    pub fn workflow(&self) -> &WorkflowClient {
        &self.workflow
    }

    pub fn auth(&self) -> &AuthServiceClient {
        &self.auth
    }

    /// `GET <base>/ping`; true on any 2xx. Not retried.
    pub async fn ping(&self, base: &Url) -> bool {
        let url = endpoint_url(base, "ping");
        match self.http.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(%url, error = %e, "health probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_keeps_base_prefix() {
        let base = Url::parse("http://localhost:3447/fhir").unwrap();
        assert_eq!(endpoint_url(&base, "Location"), "http://localhost:3447/fhir/Location");
        let base = Url::parse("http://localhost:4040/").unwrap();
        assert_eq!(endpoint_url(&base, "/authenticate"), "http://localhost:4040/authenticate");
    }
}
