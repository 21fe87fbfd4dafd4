use mongodb::{Client, bson::doc, options::ClientOptions};
use std::time::Duration;
use tracing::{info, warn};

use super::MongoConfig;
use crate::common::{DatabaseError, DatabaseResult};

/// Build driver options from a MongoConfig
async fn client_options(config: &MongoConfig) -> DatabaseResult<ClientOptions> {
    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    Ok(options)
}

/// Connect using a MongoConfig
///
/// The returned client is already verified with a `ping` against the
/// configured database, so callers can start serving traffic right away.
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, connect_from_config};
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "item_db");
/// let client = connect_from_config(&config).await?;
/// ```
pub async fn connect_from_config(config: &MongoConfig) -> DatabaseResult<Client> {
    info!("Attempting to connect to MongoDB at {}", config.url);

    let client = Client::with_options(client_options(config).await?)?;

    if let Err(e) = client
        .database(&config.database)
        .run_command(doc! { "ping": 1 })
        .await
    {
        warn!(error = %e, "MongoDB ping failed, releasing client");
        client.shutdown().await;
        return Err(DatabaseError::ConnectionFailed(e.to_string()));
    }

    info!(database = %config.database, "Successfully connected to MongoDB");
    Ok(client)
}

/// Close every pooled connection held by `client`
///
/// Waits for in-flight operations on other handles of the same client to
/// finish before returning.
pub async fn disconnect(client: Client) {
    info!("Closing MongoDB connections");
    client.shutdown().await;
    info!("MongoDB connections closed");
}
