//! # crvs-user-mgnt: Binary Entry Point

use anyhow::Context;
use crvs_auth::{TokenVerifier, USER_MGNT_AUDIENCE};
use crvs_user_mgnt::UserMgntConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = UserMgntConfig::from_env().context("invalid user-mgnt configuration")?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if config.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let verifier = TokenVerifier::from_pem_file(&config.cert_public_key_path, USER_MGNT_AUDIENCE)
        .context("failed to load auth public key")?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("user-mgnt listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, crvs_user_mgnt::app(verifier)).await?;

    Ok(())
}
