//! Shared key generation for storage backends.
//!
//! Key format: `uploads/{upload-date}/{media_id}-{file_name}` where the date
//! is the UTC calendar day of the upload intent.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Derive the storage key for an upload.
///
/// The derivation is deterministic: the same `(date, media_id, file_name)`
/// always produces the same key, and media-id uniqueness guarantees key
/// uniqueness. File names that would escape the upload prefix are rejected.
pub fn upload_key(date: NaiveDate, media_id: Uuid, file_name: &str) -> StorageResult<String> {
    if file_name.is_empty() {
        return Err(StorageError::InvalidKey("File name is empty".to_string()));
    }
    if file_name.contains('/') || file_name.contains("..") {
        return Err(StorageError::InvalidKey(
            "File name contains path separators".to_string(),
        ));
    }

    Ok(format!(
        "uploads/{}/{}-{}",
        date.format("%Y-%m-%d"),
        media_id,
        file_name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
    }

    #[test]
    fn key_is_deterministic() {
        let id = Uuid::new_v4();
        let a = upload_key(date(), id, "cake.jpg").unwrap();
        let b = upload_key(date(), id, "cake.jpg").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, format!("uploads/2025-06-14/{}-cake.jpg", id));
    }

    #[test]
    fn distinct_ids_give_distinct_keys() {
        let a = upload_key(date(), Uuid::new_v4(), "cake.jpg").unwrap();
        let b = upload_key(date(), Uuid::new_v4(), "cake.jpg").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_traversal() {
        let id = Uuid::new_v4();
        assert!(upload_key(date(), id, "../secrets.txt").is_err());
        assert!(upload_key(date(), id, "a/b.jpg").is_err());
        assert!(upload_key(date(), id, "").is_err());
    }
}
