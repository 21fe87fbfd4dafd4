//! Application state management.
//!
//! This module defines the shared application state passed to all request handlers.

use mongodb::{Client, Database};

/// Shared application state.
///
/// Built only after MongoDB answered a ping, and dropped with the router
/// before the client is shut down, so handlers never see an unconnected
/// or closed store.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    /// Handle to the configured database (`item_db` by default)
    pub db: Database,
}
