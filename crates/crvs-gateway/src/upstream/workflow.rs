//! Client for the workflow service.

use serde_json::Value;
use url::Url;

use super::{endpoint_url, UpstreamError};

#[derive(Debug, Clone)]
pub struct WorkflowClient {
    http: reqwest::Client,
    base_url: Url,
}

impl WorkflowClient {
    pub(crate) fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Submit an event-notification bundle on behalf of the caller.
    ///
    /// Calls `POST {base_url}/records/event-notification`. The upstream
    /// status and JSON body are returned whatever the status; a non-JSON
    /// body becomes `null`.
    pub async fn event_notification(
        &self,
        bundle: &Value,
        authorization: &str,
    ) -> Result<(u16, Value), UpstreamError> {
        let endpoint = "POST /records/event-notification";
        let url = endpoint_url(&self.base_url, "records/event-notification");

        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(bundle)
            .send()
            .await
            .map_err(|e| UpstreamError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.map_err(|e| UpstreamError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        tracing::info!(status, "event notification forwarded to workflow");
        Ok((status, body))
    }
}
