//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from
//! main.rs for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use gala_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_tracing();
    tracing::info!("Configuration loaded");

    // Setup metadata stores
    let (media_store, guest_store) = database::setup_stores(&config).await?;

    // Setup object storage
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(
        config.clone(),
        media_store,
        guest_store,
        storage,
    ));

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
