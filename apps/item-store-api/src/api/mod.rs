//! API routes module
//!
//! This module defines all HTTP API routes for the Item Store.

pub mod health;
pub mod items;

use axum::Router;
use axum_helpers::{create_router, health_router};

use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .merge(items::router(state))
        .merge(health::router(state.clone()))
        .merge(health_router(state.config.app))
}

/// Full application: API routes plus docs, tracing and fallbacks
pub fn app(state: &AppState) -> Router {
    create_router::<ApiDoc>(routes(state))
}
