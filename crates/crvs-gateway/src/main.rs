//! # crvs-gateway: Binary Entry Point
//!
//! Reads configuration from the environment, loads the auth service's
//! public key, and serves the gateway.

use anyhow::Context;
use crvs_auth::{TokenVerifier, GATEWAY_AUDIENCE};
use crvs_gateway::{AppState, GatewayConfig, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env().context("invalid gateway configuration")?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let verifier = TokenVerifier::from_pem_file(&config.cert_public_key_path, GATEWAY_AUDIENCE)
        .map_err(|e| {
            tracing::error!(
                path = %config.cert_public_key_path.display(),
                "failed to load auth public key: {e}"
            );
            e
        })?;

    let port = config.port;
    let state = AppState::new(config, verifier)?;
    let app = crvs_gateway::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("CRVS gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
