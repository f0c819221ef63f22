//! Storage backend factory.

use crate::memory::MemoryStorage;
use crate::s3::S3Storage;
use crate::traits::{ObjectStorage, StorageError, StorageResult};
use gala_core::config::StorageBackend;
use gala_core::Config;
use std::sync::Arc;

/// Create the object storage backend selected by configuration.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn ObjectStorage>> {
    match config.storage_backend {
        StorageBackend::S3 => {
            let bucket = config.s3_bucket.clone().ok_or_else(|| {
                StorageError::ConfigError("GALA_S3_BUCKET is required for the s3 backend".into())
            })?;
            let region = config
                .s3_region
                .clone()
                .unwrap_or_else(|| "eu-central-1".to_string());

            let storage = S3Storage::new(bucket, region, config.s3_endpoint.clone()).await?;
            tracing::info!(backend = "s3", "Object storage initialized");
            Ok(Arc::new(storage))
        }
        StorageBackend::Memory => {
            tracing::info!(backend = "memory", "Object storage initialized");
            Ok(Arc::new(MemoryStorage::default()))
        }
    }
}
