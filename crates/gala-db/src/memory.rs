//! In-memory metadata stores.
//!
//! The second implementation behind the store traits: used by the test
//! suites and by local runs with `GALA_METADATA_BACKEND=memory`. Semantics
//! match the Postgres stores exactly, including scan order and idempotent
//! completion.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gala_core::cursor::ScanPosition;
use gala_core::models::{GuestRecord, MediaRecord, MediaStatus};
use gala_core::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::traits::{CompletionOutcome, GuestStore, MediaScanPage, MediaStore};

/// In-memory media store.
#[derive(Clone, Default)]
pub struct MemoryMediaStore {
    records: Arc<RwLock<HashMap<Uuid, MediaRecord>>>,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records regardless of status; test helper.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// Newest-first ordering on the composite scan key.
fn scan_key(record: &MediaRecord) -> (DateTime<Utc>, Uuid) {
    (record.uploaded_at, record.id)
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn put(&self, record: &MediaRecord) -> Result<(), AppError> {
        self.records
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn complete(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<CompletionOutcome, AppError> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record) if record.status == MediaStatus::Pending => {
                record.status = MediaStatus::Completed;
                record.completed_at = Some(completed_at);
                Ok(CompletionOutcome::Completed)
            }
            Some(_) => Ok(CompletionOutcome::AlreadyCompleted),
            None => Ok(CompletionOutcome::Unknown),
        }
    }

    async fn scan_completed(
        &self,
        position: Option<ScanPosition>,
        limit: i64,
    ) -> Result<MediaScanPage, AppError> {
        let records = self.records.read().await;

        let mut completed: Vec<MediaRecord> = records
            .values()
            .filter(|r| r.status == MediaStatus::Completed)
            .filter(|r| match position {
                // Strictly after the last-evaluated position in descending order.
                Some(pos) => scan_key(r) < (pos.uploaded_at, pos.id),
                None => true,
            })
            .cloned()
            .collect();

        completed.sort_by(|a, b| scan_key(b).cmp(&scan_key(a)));

        let has_more = completed.len() as i64 > limit;
        completed.truncate(limit as usize);

        let last_position = if has_more {
            completed.last().map(|r| ScanPosition {
                uploaded_at: r.uploaded_at,
                id: r.id,
            })
        } else {
            None
        };

        Ok(MediaScanPage {
            records: completed,
            last_position,
            has_more,
        })
    }

    async fn count_completed(&self) -> Result<u64, AppError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.status == MediaStatus::Completed)
            .count() as u64)
    }
}

/// In-memory guest store.
#[derive(Clone, Default)]
pub struct MemoryGuestStore {
    records: Arc<RwLock<HashMap<Uuid, GuestRecord>>>,
}

impl MemoryGuestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl GuestStore for MemoryGuestStore {
    async fn put(&self, record: &GuestRecord) -> Result<(), AppError> {
        self.records
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<GuestRecord>, AppError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<GuestRecord>, AppError> {
        let records = self.records.read().await;
        // Oldest row wins, mirroring the Postgres ORDER BY created_at, id.
        Ok(records
            .values()
            .filter(|g| g.name == name)
            .min_by_key(|g| (g.created_at, g.id))
            .cloned())
    }

    async fn touch_last_upload(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        if let Some(record) = self.records.write().await.get_mut(&id) {
            record.last_upload = at;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record_at(uploaded_at: DateTime<Utc>, status: MediaStatus) -> MediaRecord {
        let id = Uuid::new_v4();
        MediaRecord {
            id,
            file_name: "photo.jpg".to_string(),
            file_type: "image/jpeg".to_string(),
            file_size: 1024,
            storage_key: format!("uploads/2025-06-14/{}-photo.jpg", id),
            guest_id: Uuid::new_v4(),
            guest_name: "Alex".to_string(),
            uploaded_at,
            status,
            completed_at: None,
        }
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn put_then_get_pending() {
        let store = MemoryMediaStore::new();
        let record = record_at(base_time(), MediaStatus::Pending);
        store.put(&record).await.unwrap();

        let found = store.get(record.id).await.unwrap().unwrap();
        assert_eq!(found.status, MediaStatus::Pending);
        assert_eq!(found, record);
    }

    #[tokio::test]
    async fn completion_is_idempotent_with_single_timestamp() {
        let store = MemoryMediaStore::new();
        let record = record_at(base_time(), MediaStatus::Pending);
        store.put(&record).await.unwrap();

        let first_at = base_time() + Duration::minutes(5);
        let second_at = base_time() + Duration::minutes(30);

        assert_eq!(
            store.complete(record.id, first_at).await.unwrap(),
            CompletionOutcome::Completed
        );
        assert_eq!(
            store.complete(record.id, second_at).await.unwrap(),
            CompletionOutcome::AlreadyCompleted
        );

        let found = store.get(record.id).await.unwrap().unwrap();
        assert_eq!(found.status, MediaStatus::Completed);
        assert_eq!(found.completed_at, Some(first_at));
    }

    #[tokio::test]
    async fn completion_of_unknown_id_is_a_no_op() {
        let store = MemoryMediaStore::new();
        let outcome = store.complete(Uuid::new_v4(), base_time()).await.unwrap();
        assert_eq!(outcome, CompletionOutcome::Unknown);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn scan_excludes_pending() {
        let store = MemoryMediaStore::new();
        store
            .put(&record_at(base_time(), MediaStatus::Pending))
            .await
            .unwrap();
        store
            .put(&record_at(base_time(), MediaStatus::Completed))
            .await
            .unwrap();

        let page = store.scan_completed(None, 10).await.unwrap();
        assert_eq!(page.records.len(), 1);
        assert!(!page.has_more);
        assert!(page.last_position.is_none());
        assert_eq!(store.count_completed().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn paginated_scan_is_exactly_once_and_newest_first() {
        let store = MemoryMediaStore::new();
        let mut ids = Vec::new();
        for i in 0..25 {
            let record = record_at(
                base_time() + Duration::seconds(i),
                MediaStatus::Completed,
            );
            ids.push(record.id);
            store.put(&record).await.unwrap();
        }

        let mut seen = Vec::new();
        let mut position = None;
        loop {
            let page = store.scan_completed(position, 10).await.unwrap();
            // Within a page, strictly descending by the composite key.
            for pair in page.records.windows(2) {
                assert!(scan_key(&pair[0]) > scan_key(&pair[1]));
            }
            seen.extend(page.records.iter().map(|r| r.id));
            assert_eq!(page.has_more, page.last_position.is_some());
            match page.last_position {
                Some(pos) => position = Some(pos),
                None => break,
            }
        }

        assert_eq!(seen.len(), 25);
        let mut unique = seen.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 25, "pages delivered a duplicate");
        // Newest record first overall.
        assert_eq!(seen.first(), ids.last());
    }

    #[tokio::test]
    async fn scan_tie_breaks_on_id_at_equal_timestamps() {
        let store = MemoryMediaStore::new();
        for _ in 0..5 {
            store
                .put(&record_at(base_time(), MediaStatus::Completed))
                .await
                .unwrap();
        }

        let first = store.scan_completed(None, 3).await.unwrap();
        assert!(first.has_more);
        let rest = store
            .scan_completed(first.last_position, 3)
            .await
            .unwrap();
        assert_eq!(first.records.len() + rest.records.len(), 5);

        let mut all: Vec<Uuid> = first
            .records
            .iter()
            .chain(rest.records.iter())
            .map(|r| r.id)
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn guest_find_by_name_prefers_oldest() {
        let store = MemoryGuestStore::new();
        let older = GuestRecord {
            id: Uuid::new_v4(),
            name: "Sam".to_string(),
            created_at: base_time(),
            last_upload: base_time(),
        };
        let newer = GuestRecord {
            id: Uuid::new_v4(),
            name: "Sam".to_string(),
            created_at: base_time() + Duration::seconds(1),
            last_upload: base_time() + Duration::seconds(1),
        };
        store.put(&newer).await.unwrap();
        store.put(&older).await.unwrap();

        let found = store.find_by_name("Sam").await.unwrap().unwrap();
        assert_eq!(found.id, older.id);
        assert!(store.find_by_name("Riley").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn touch_last_upload_updates_existing() {
        let store = MemoryGuestStore::new();
        let guest = GuestRecord::new("Alex", base_time());
        store.put(&guest).await.unwrap();

        let later = base_time() + Duration::hours(2);
        store.touch_last_upload(guest.id, later).await.unwrap();

        let found = store.get(guest.id).await.unwrap().unwrap();
        assert_eq!(found.last_upload, later);
        assert_eq!(found.created_at, base_time());
    }
}
