mod api;
mod auth;
mod config;
mod engine;
mod error;
mod models;
mod observability;
mod state;
mod store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;
use crate::store::UserStore;
use crate::store::memory::MemoryUserStore;
use crate::store::postgres::PgUserStore;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let users: Arc<dyn UserStore> = match &config.database_url {
        Some(url) => {
            let store = PgUserStore::connect(url)
                .await
                .map_err(|err| AppError::Internal(format!("database connection failed: {err}")))?;
            tracing::info!("connected to postgres");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory user store");
            Arc::new(MemoryUserStore::new())
        }
    };

    let shared_state = Arc::new(state::AppState::new(
        users,
        &config.jwt_secret,
        config.sim.clone(),
        config.event_buffer_size,
    ));

    let app = api::rest::router(shared_state.clone());

    tokio::spawn(engine::fleet::run_fleet_jitter(shared_state.clone()));

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
