//! # Operational Routes
//!
//! - `GET /ping`: health of all platform services, or of those named by
//!   repeated `service` query parameters.
//! - `GET /metrics`: in-process request counters.

use axum::extract::{RawQuery, State};
use axum::routing::get;
use axum::{Json, Router};
use crvs_core::{ServiceName, ValidationError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::middleware::metrics::MetricsSnapshot;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(check_health))
        .route("/metrics", get(metrics))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Health of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServiceHealth {
    pub name: String,
    pub status: HealthStatus,
}

/// Services named by `service=` parameters, in order; all services if none.
pub fn requested_services(query: Option<&str>) -> Result<Vec<ServiceName>, ValidationError> {
    let mut services = Vec::new();
    for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        if key != "service" {
            return Err(ValidationError::NotAllowed {
                field: "query".into(),
                value: key.into_owned(),
                allowed: "service".into(),
            });
        }
        services.push(value.parse::<ServiceName>()?);
    }
    if services.is_empty() {
        services.extend(ServiceName::ALL);
    }
    Ok(services)
}

/// GET /ping: Probe each service's own `/ping`.
#[utoipa::path(
    get,
    path = "/ping",
    params(("service" = Option<Vec<String>>, Query, description = "Service to check; may repeat")),
    responses(
        (status = 200, description = "Health of each requested service", body = [ServiceHealth]),
        (status = 400, description = "Unknown service name"),
    ),
    tag = "health"
)]
pub async fn check_health(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<ServiceHealth>>, AppError> {
    let services = requested_services(query.as_deref())?;

    let probes: Vec<_> = services
        .into_iter()
        .map(|service| {
            let upstream = state.upstream.clone();
            let url = state.config.service_url(service).cloned();
            let probe = tokio::spawn(async move {
                match url {
                    Some(url) => upstream.ping(&url).await,
                    None => true,
                }
            });
            (service, probe)
        })
        .collect();

    let mut report = Vec::with_capacity(probes.len());
    for (service, probe) in probes {
        let healthy = probe.await.unwrap_or(false);
        if !healthy {
            tracing::warn!(service = %service, "service health check failed");
        }
        report.push(ServiceHealth {
            name: service.as_str().to_string(),
            status: if healthy {
                HealthStatus::Ok
            } else {
                HealthStatus::Error
            },
        });
    }
    Ok(Json(report))
}

/// GET /metrics: Request counters since start.
#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = 200, description = "Request counters", body = MetricsSnapshot)),
    tag = "health"
)]
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_query_means_every_service() {
        assert_eq!(requested_services(None).unwrap(), ServiceName::ALL.to_vec());
        assert_eq!(requested_services(Some("")).unwrap(), ServiceName::ALL.to_vec());
    }

    #[test]
    fn repeated_service_params_keep_order() {
        let services = requested_services(Some("service=workflow&service=auth")).unwrap();
        assert_eq!(services, vec![ServiceName::Workflow, ServiceName::Auth]);
    }

    #[test]
    fn unknown_service_rejected() {
        let err = requested_services(Some("service=billing")).unwrap_err();
        assert!(err.to_string().contains("billing"));
    }

    #[test]
    fn unknown_parameter_rejected() {
        assert!(requested_services(Some("services=auth")).is_err());
    }
}
