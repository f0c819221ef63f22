//! Metadata store setup.

use anyhow::{Context, Result};
use gala_core::config::MetadataBackend;
use gala_core::Config;
use gala_db::{GuestStore, MediaStore, MemoryGuestStore, MemoryMediaStore, PgGuestStore, PgMediaStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// Create the media and guest stores selected by configuration.
///
/// For Postgres this connects a pool and runs the workspace migrations;
/// the memory backend needs no setup and loses data on restart.
pub async fn setup_stores(
    config: &Config,
) -> Result<(Arc<dyn MediaStore>, Arc<dyn GuestStore>)> {
    match config.metadata_backend {
        MetadataBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(database_url)
                .await
                .context("Failed to connect to Postgres")?;

            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            tracing::info!(
                backend = "postgres",
                max_connections = config.db_max_connections,
                "Metadata stores initialized"
            );

            Ok((
                Arc::new(PgMediaStore::new(pool.clone())),
                Arc::new(PgGuestStore::new(pool)),
            ))
        }
        MetadataBackend::Memory => {
            tracing::info!(backend = "memory", "Metadata stores initialized");
            Ok((
                Arc::new(MemoryMediaStore::new()),
                Arc::new(MemoryGuestStore::new()),
            ))
        }
    }
}
