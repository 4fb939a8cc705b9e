//! Raw pass-through client for the auth service.

use axum::body::Bytes;
use url::Url;

use super::{endpoint_url, UpstreamError};

/// An upstream response relayed verbatim.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct AuthServiceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AuthServiceClient {
    pub(crate) fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// `POST {base_url}/{suffix}` with the caller's body and content type.
    ///
    /// Sent once: auth endpoints count failed attempts.
    pub async fn forward(
        &self,
        suffix: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<ForwardedResponse, UpstreamError> {
        let endpoint = format!("POST /{suffix}");
        let url = endpoint_url(&self.base_url, suffix);

        let mut req = self.http.post(&url).body(body);
        if let Some(ct) = content_type {
            req = req.header(reqwest::header::CONTENT_TYPE, ct);
        }
        let resp = req.send().await.map_err(|e| UpstreamError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await.map_err(|e| UpstreamError::Http {
            endpoint,
            source: e,
        })?;

        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }
}
