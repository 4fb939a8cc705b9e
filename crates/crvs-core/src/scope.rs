//! # Token Scopes
//!
//! Permission strings carried in the `scope` claim of bearer tokens issued
//! by the auth service. Routes declare the scopes they accept; a caller
//! needs any one of them.

use serde::{Deserialize, Serialize};

/// A permission carried in a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Submit declarations.
    #[serde(rename = "declare")]
    Declare,
    /// Register declarations.
    #[serde(rename = "register")]
    Register,
    /// Print certificates.
    #[serde(rename = "certify")]
    Certify,
    /// View performance reports.
    #[serde(rename = "performance")]
    Performance,
    /// Local system administration.
    #[serde(rename = "sysadmin")]
    SysAdmin,
    /// National system administration (locations, facilities).
    #[serde(rename = "natlsysadmin")]
    NatlSysAdmin,
    /// Validate declarations.
    #[serde(rename = "validate")]
    Validate,
    /// Search registered records.
    #[serde(rename = "recordsearch")]
    RecordSearch,
    /// Demo-only operations.
    #[serde(rename = "demo")]
    Demo,
    /// Machine clients submitting event notifications.
    #[serde(rename = "notification-api")]
    NotificationApi,
    /// Application configuration.
    #[serde(rename = "config")]
    Config,
    /// Plain authenticated user.
    #[serde(rename = "user")]
    User,
}

impl Scope {
    /// Every scope, in declaration order.
    pub const ALL: [Scope; 12] = [
        Scope::Declare,
        Scope::Register,
        Scope::Certify,
        Scope::Performance,
        Scope::SysAdmin,
        Scope::NatlSysAdmin,
        Scope::Validate,
        Scope::RecordSearch,
        Scope::Demo,
        Scope::NotificationApi,
        Scope::Config,
        Scope::User,
    ];

    /// The token string for this scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Declare => "declare",
            Self::Register => "register",
            Self::Certify => "certify",
            Self::Performance => "performance",
            Self::SysAdmin => "sysadmin",
            Self::NatlSysAdmin => "natlsysadmin",
            Self::Validate => "validate",
            Self::RecordSearch => "recordsearch",
            Self::Demo => "demo",
            Self::NotificationApi => "notification-api",
            Self::Config => "config",
            Self::User => "user",
        }
    }

    /// Parse a token string. Unknown strings yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_matches_as_str_for_every_scope() {
        for scope in Scope::ALL {
            assert_eq!(Scope::parse(scope.as_str()), Some(scope));
        }
    }

    #[test]
    fn unknown_scope_is_none() {
        assert_eq!(Scope::parse("superuser"), None);
        assert_eq!(Scope::parse(""), None);
    }

    #[test]
    fn serde_uses_token_strings() {
        let json = serde_json::to_string(&Scope::NotificationApi).unwrap();
        assert_eq!(json, "\"notification-api\"");
        let back: Scope = serde_json::from_str("\"natlsysadmin\"").unwrap();
        assert_eq!(back, Scope::NatlSysAdmin);
    }
}
