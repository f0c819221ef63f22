use crate::traits::{ObjectStorage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use gala_core::config::StorageBackend;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// In-memory storage implementation, for tests and local runs without S3.
///
/// "Presigned" URLs are shaped `{base_url}/{key}?expires={unix}` so callers
/// can assert on the signing window; nothing serves them. Uploads go through
/// `put` directly instead of an HTTP PUT.
#[derive(Clone)]
pub struct MemoryStorage {
    objects: Arc<RwLock<HashMap<String, (Bytes, String)>>>,
    base_url: String,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new("https://storage.test")
    }
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        MemoryStorage {
            objects: Arc::new(RwLock::new(HashMap::new())),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn signed_url(&self, storage_key: &str, expires_in: Duration) -> String {
        let expires = Utc::now().timestamp() + expires_in.as_secs() as i64;
        format!("{}/{}?expires={}", self.base_url, storage_key, expires)
    }

    /// Number of stored objects; test helper.
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Stored content type for a key; test helper.
    pub async fn content_type_of(&self, storage_key: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(storage_key)
            .map(|(_, ct)| ct.clone())
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(self.signed_url(storage_key, expires_in))
    }

    async fn presigned_get_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(self.signed_url(storage_key, expires_in))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.objects.read().await.contains_key(storage_key))
    }

    async fn put(&self, storage_key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        self.objects
            .write()
            .await
            .insert(storage_key.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        match self.objects.write().await.remove(storage_key) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(storage_key.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_exists() {
        let storage = MemoryStorage::default();
        let key = "uploads/2025-06-14/abc-cake.jpg";
        assert!(!storage.exists(key).await.unwrap());

        storage
            .put(key, Bytes::from_static(b"jpeg bytes"), "image/jpeg")
            .await
            .unwrap();

        assert!(storage.exists(key).await.unwrap());
        assert_eq!(
            storage.content_type_of(key).await.as_deref(),
            Some("image/jpeg")
        );
    }

    #[tokio::test]
    async fn signed_urls_carry_expiry() {
        let storage = MemoryStorage::new("https://storage.test/");
        let url = storage
            .presigned_get_url("uploads/x", Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(url.starts_with("https://storage.test/uploads/x?expires="));

        // Two signings produce fresh URLs, never a cached one.
        let put_url = storage
            .presigned_put_url("uploads/x", "image/png", Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(put_url.contains("expires="));
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let storage = MemoryStorage::default();
        let err = storage.delete("missing").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
