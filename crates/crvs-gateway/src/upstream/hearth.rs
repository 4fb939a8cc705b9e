//! Client for the Hearth FHIR store (`Location` resources).

use crvs_forms::LocationResource;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use super::retry::retry_send;
use super::{endpoint_url, ensure_success, UpstreamError};

#[derive(Debug, Clone)]
pub struct HearthClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HearthClient {
    pub(crate) fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Search locations. `query` is passed through verbatim.
    ///
    /// Calls `GET {base_url}/Location?{query}` and returns the bundle.
    pub async fn search(&self, query: Option<&str>) -> Result<Value, UpstreamError> {
        let endpoint = "GET /Location";
        let mut url = endpoint_url(&self.base_url, "Location");
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(q);
        }

        let resp = retry_send(|| self.http.get(&url).send())
            .await
            .map_err(|e| UpstreamError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;
        let resp = ensure_success(endpoint, resp).await?;
        resp.json().await.map_err(|e| UpstreamError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }

    /// Fetch one location. `None` on 404.
    pub async fn get(&self, id: Uuid) -> Result<Option<LocationResource>, UpstreamError> {
        let endpoint = format!("GET /Location/{id}");
        let url = endpoint_url(&self.base_url, &format!("Location/{id}"));

        let resp = retry_send(|| self.http.get(&url).send())
            .await
            .map_err(|e| UpstreamError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = ensure_success(&endpoint, resp).await?;
        resp.json()
            .await
            .map(Some)
            .map_err(|e| UpstreamError::Deserialization {
                endpoint,
                source: e,
            })
    }

    /// Whether any location carries an identifier with this value.
    pub async fn identifier_exists(&self, value: &str) -> Result<bool, UpstreamError> {
        let endpoint = "GET /Location?identifier";
        let url = endpoint_url(&self.base_url, "Location");

        let resp = retry_send(|| self.http.get(&url).query(&[("identifier", value)]).send())
            .await
            .map_err(|e| UpstreamError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;
        let resp = ensure_success(endpoint, resp).await?;
        let bundle: Value = resp.json().await.map_err(|e| UpstreamError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;

        let total = bundle.get("total").and_then(Value::as_u64).unwrap_or(0);
        let entries = bundle
            .get("entry")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        Ok(total > 0 || entries > 0)
    }

    /// Create a location and return its id.
    ///
    /// Hearth answers `201` with `Location: Location/<id>/_history/<v>`; the
    /// body `id` is used when the header is absent.
    pub async fn create(&self, resource: &LocationResource) -> Result<String, UpstreamError> {
        let endpoint = "POST /Location";
        let url = endpoint_url(&self.base_url, "Location");

        let resp = self
            .http
            .post(&url)
            .json(resource)
            .send()
            .await
            .map_err(|e| UpstreamError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;
        let resp = ensure_success(endpoint, resp).await?;

        let from_header = resp
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(id_from_location_header);
        if let Some(id) = from_header {
            return Ok(id);
        }

        let body: Value = resp.json().await.map_err(|e| UpstreamError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;
        body.get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| UpstreamError::Status {
                endpoint: endpoint.into(),
                status: 201,
                body: "response carried no resource id".into(),
            })
    }

    /// Replace a location.
    pub async fn update(&self, id: Uuid, resource: &LocationResource) -> Result<(), UpstreamError> {
        let endpoint = format!("PUT /Location/{id}");
        let url = endpoint_url(&self.base_url, &format!("Location/{id}"));

        let resp = self
            .http
            .put(&url)
            .json(resource)
            .send()
            .await
            .map_err(|e| UpstreamError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;
        ensure_success(&endpoint, resp).await?;
        Ok(())
    }
}

/// `Location/<id>/_history/<v>` (absolute or relative) → `<id>`.
fn id_from_location_header(value: &str) -> Option<String> {
    let mut segments = value.split('/');
    segments.find(|s| *s == "Location")?;
    segments
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
