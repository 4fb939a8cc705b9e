//! # Events and Services
//!
//! Closed vocabularies shared between the form engine and the gateway.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A vital event a declaration describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    /// Birth of a child.
    Birth,
    /// Death of a person.
    Death,
}

impl Event {
    /// Lowercase name, as used in form field names (`placeOfBirth`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Birth => "birth",
            Self::Death => "death",
        }
    }
}

/// A platform service reachable from the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceName {
    /// Authentication service.
    #[serde(rename = "auth")]
    Auth,
    /// User management service.
    #[serde(rename = "user-mgnt")]
    UserMgnt,
    /// Record workflow service.
    #[serde(rename = "workflow")]
    Workflow,
    /// Record search service.
    #[serde(rename = "search")]
    Search,
    /// Performance metrics service.
    #[serde(rename = "metrics")]
    Metrics,
    /// SMS/email notification service.
    #[serde(rename = "notification")]
    Notification,
    /// Country configuration service.
    #[serde(rename = "countryconfig")]
    CountryConfig,
    /// The gateway itself.
    #[serde(rename = "gateway")]
    Gateway,
}

impl ServiceName {
    /// Every service, in health-check order.
    pub const ALL: [ServiceName; 8] = [
        ServiceName::Auth,
        ServiceName::UserMgnt,
        ServiceName::Workflow,
        ServiceName::Search,
        ServiceName::Metrics,
        ServiceName::Notification,
        ServiceName::CountryConfig,
        ServiceName::Gateway,
    ];

    /// Wire name of the service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::UserMgnt => "user-mgnt",
            Self::Workflow => "workflow",
            Self::Search => "search",
            Self::Metrics => "metrics",
            Self::Notification => "notification",
            Self::CountryConfig => "countryconfig",
            Self::Gateway => "gateway",
        }
    }
}

impl std::fmt::Display for ServiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|svc| svc.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "service".into(),
                value: s.to_string(),
                allowed: Self::ALL
                    .iter()
                    .map(|svc| svc.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_names_round_trip_through_from_str() {
        for svc in ServiceName::ALL {
            assert_eq!(svc.as_str().parse::<ServiceName>().unwrap(), svc);
        }
    }

    #[test]
    fn unknown_service_lists_allowed_values() {
        let err = "billing".parse::<ServiceName>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("billing"));
        assert!(msg.contains("user-mgnt"));
    }

    #[test]
    fn event_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Event::Death).unwrap(), "\"death\"");
    }
}
