use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use car_doctor::app::build_router;
use car_doctor::config::AppConfig;
use car_doctor::db::{seed, Store};
use car_doctor::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    anyhow::ensure!(
        !config.access_token_secret.is_empty(),
        "ACCESS_TOKEN_SECRET must be set"
    );

    let store = Store::open(&config.database_url)?;
    store.ping()?;
    tracing::info!("connected to document store at {}", config.database_url);

    if let Some(path) = &config.services_seed {
        seed::load_services(&store, path)?;
    }

    let state = Arc::new(AppState::new(store, config.clone()));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("car doctor server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
