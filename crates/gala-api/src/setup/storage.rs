//! Object storage setup.

use anyhow::{Context, Result};
use gala_core::Config;
use gala_storage::{create_storage, ObjectStorage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectStorage>> {
    create_storage(config)
        .await
        .context("Failed to initialize object storage")
}
