//! Environment configuration for the user-management service.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct UserMgntConfig {
    pub port: u16,
    /// PEM public key of the auth service.
    pub cert_public_key_path: PathBuf,
    /// JSON lines instead of pretty output.
    pub json_logs: bool,
}

impl UserMgntConfig {
    /// Load from `PORT` (default 3030), `CERT_PUBLIC_KEY_PATH` and `LOG_FORMAT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 3030,
        };
        Ok(Self {
            port,
            cert_public_key_path: lookup("CERT_PUBLIC_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("../../.secrets/public-key.pem")),
            json_logs: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = UserMgntConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 3030);
        assert!(!config.json_logs);
    }

    #[test]
    fn overrides_and_bad_port() {
        let config = UserMgntConfig::from_lookup(|var| match var {
            "PORT" => Some("4000".into()),
            "LOG_FORMAT" => Some("JSON".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.port, 4000);
        assert!(config.json_logs);

        let err = UserMgntConfig::from_lookup(|var| (var == "PORT").then(|| "http".into()));
        assert!(matches!(err, Err(ConfigError::InvalidPort(p)) if p == "http"));
    }
}
