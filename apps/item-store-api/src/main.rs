use axum_helpers::serve;
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::WrapErr;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    init_tracing(&config.environment);

    // No retry: an unreachable store at startup is fatal
    let mongo_client = database::mongodb::connect_from_config(&config.mongodb)
        .await
        .wrap_err_with(|| format!("Failed to connect to MongoDB at {}", config.mongodb.url()))?;

    let db = mongo_client.database(config.mongodb.database());

    let state = AppState {
        config,
        mongo_client: mongo_client.clone(),
        db,
    };

    let app = api::app(&state);
    let server_config = state.config.server.clone();
    drop(state);

    info!("Starting Item Store API");

    serve(app, &server_config, SHUTDOWN_TIMEOUT, async move {
        database::mongodb::disconnect(mongo_client).await;
    })
    .await
    .wrap_err("Server error")?;

    info!("Item Store API shutdown complete");
    Ok(())
}
