use std::sync::Arc;

use anyhow::Context;
use sharpline_api::auth::TokenVerifier;
use sharpline_api::config::AppConfig;
use sharpline_api::database::PgStore;
use sharpline_api::services::mailer_from_config;
use sharpline_api::{router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sharpline_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting Sharpline API in {:?} mode", config.environment);

    let store = PgStore::connect(&config.database)
        .await
        .context("failed to open database pool")?;
    let verifier = TokenVerifier::new(&config.security.jwt_secret)?;
    let mailer = mailer_from_config(&config.email).context("failed to build mailer")?;
    let port = config.api.port;

    let state = AppState::new(config, Arc::new(store.clone()), verifier, mailer);
    let app = router(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Sharpline API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
