//! Gateway configuration.
//!
//! Read once at startup from environment variables. Every upstream has a
//! local-development default, so a bare `cargo run` talks to services on
//! their usual ports.

use std::path::PathBuf;

use crvs_core::ServiceName;
use url::Url;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Configuration of the gateway process.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub auth_url: Url,
    /// Base URL of the FHIR store, including the `/fhir` prefix.
    pub hearth_url: Url,
    pub workflow_url: Url,
    pub user_mgnt_url: Url,
    pub search_url: Url,
    pub metrics_url: Url,
    pub notification_url: Url,
    pub country_config_url: Url,
    /// PEM public key of the auth service.
    pub cert_public_key_path: PathBuf,
    pub upstream_timeout_secs: u64,
    pub log_format: LogFormat,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 7070)
    /// - `AUTH_URL` (default: `http://localhost:4040`)
    /// - `HEARTH_URL` (default: `http://localhost:3447/fhir`)
    /// - `WORKFLOW_URL` (default: `http://localhost:5050`)
    /// - `USER_MANAGEMENT_URL` (default: `http://localhost:3030`)
    /// - `SEARCH_URL` (default: `http://localhost:9090`)
    /// - `METRICS_URL` (default: `http://localhost:1050`)
    /// - `NOTIFICATION_URL` (default: `http://localhost:2020`)
    /// - `COUNTRY_CONFIG_URL` (default: `http://localhost:3040`)
    /// - `CERT_PUBLIC_KEY_PATH` (default: `../../.secrets/public-key.pem`)
    /// - `UPSTREAM_TIMEOUT_SECS` (default: 30)
    /// - `LOG_FORMAT` (`json` for JSON lines, anything else for pretty output)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = |var: &str, default: &str| -> Result<Url, ConfigError> {
            let raw = lookup(var).unwrap_or_else(|| default.to_string());
            Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("PORT".into(), raw))?,
            None => 7070,
        };
        let upstream_timeout_secs = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("UPSTREAM_TIMEOUT_SECS".into(), raw))?,
            None => 30,
        };

        Ok(Self {
            port,
            auth_url: url("AUTH_URL", "http://localhost:4040")?,
            hearth_url: url("HEARTH_URL", "http://localhost:3447/fhir")?,
            workflow_url: url("WORKFLOW_URL", "http://localhost:5050")?,
            user_mgnt_url: url("USER_MANAGEMENT_URL", "http://localhost:3030")?,
            search_url: url("SEARCH_URL", "http://localhost:9090")?,
            metrics_url: url("METRICS_URL", "http://localhost:1050")?,
            notification_url: url("NOTIFICATION_URL", "http://localhost:2020")?,
            country_config_url: url("COUNTRY_CONFIG_URL", "http://localhost:3040")?,
            cert_public_key_path: lookup("CERT_PUBLIC_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("../../.secrets/public-key.pem")),
            upstream_timeout_secs,
            log_format: LogFormat::parse(lookup("LOG_FORMAT").as_deref()),
        })
    }

    /// Base URL of a platform service. The gateway itself has none.
    pub fn service_url(&self, service: ServiceName) -> Option<&Url> {
        match service {
            ServiceName::Auth => Some(&self.auth_url),
            ServiceName::UserMgnt => Some(&self.user_mgnt_url),
            ServiceName::Workflow => Some(&self.workflow_url),
            ServiceName::Search => Some(&self.search_url),
            ServiceName::Metrics => Some(&self.metrics_url),
            ServiceName::Notification => Some(&self.notification_url),
            ServiceName::CountryConfig => Some(&self.country_config_url),
            ServiceName::Gateway => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("{0} must be a number, got {1:?}")]
    InvalidNumber(String, String),
}
