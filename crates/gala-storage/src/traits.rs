//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends must
//! implement. Gala never proxies media bytes: clients upload and download
//! directly against presigned URLs, so the trait is built around signing.

use async_trait::async_trait;
use bytes::Bytes;
use gala_core::config::StorageBackend;
use gala_core::AppError;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("URL signing failed: {0}")]
    SignFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            StorageError::SignFailed(msg)
            | StorageError::UploadFailed(msg)
            | StorageError::BackendError(msg) => AppError::Storage(msg),
        }
    }
}

/// Storage abstraction trait
///
/// All storage backends (S3, in-memory) must implement this trait. This keeps
/// the upload and listing services decoupled from any specific provider.
///
/// **Key format:** `uploads/{date}/{media_id}-{file_name}`. See the crate
/// root documentation and the `keys` module.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Generate a presigned PUT URL for a direct upload.
    ///
    /// The client uploads its bytes with HTTP PUT to the returned URL,
    /// sending the given content type. URLs are single-purpose and expire
    /// after `expires_in`; retries must request a fresh intent.
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Generate a presigned GET URL for direct download.
    ///
    /// Minted per listing request and never cached, so URLs always reflect
    /// current access policy and never outlive their validity window.
    async fn presigned_get_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Check if an object exists.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Upload data directly to a key, bypassing the presigned flow.
    /// Used by tooling and tests; the client protocol always PUTs to a
    /// presigned URL instead.
    async fn put(&self, storage_key: &str, data: Bytes, content_type: &str) -> StorageResult<()>;

    /// Delete an object by its storage key.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Get the storage backend type.
    fn backend_type(&self) -> StorageBackend;
}
