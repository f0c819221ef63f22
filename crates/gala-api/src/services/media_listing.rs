//! Gallery listing: cursor-paginated scan of completed media with fresh
//! download URLs.

use gala_core::cursor::ScanPosition;
use gala_core::models::{MediaPage, MediaView};
use gala_core::AppError;
use gala_db::MediaStore;
use gala_storage::ObjectStorage;
use std::sync::Arc;
use std::time::Duration;

/// Returns pages of completed media, newest first.
///
/// Every returned item carries a download URL signed for this request;
/// signing is never cached, so URLs always reflect current access policy.
/// `total` counts completed records only - the set listing can ever expose.
#[derive(Clone)]
pub struct MediaListingService {
    media: Arc<dyn MediaStore>,
    storage: Arc<dyn ObjectStorage>,
    download_url_ttl: Duration,
    default_page_size: i64,
    max_page_size: i64,
}

impl MediaListingService {
    pub fn new(
        media: Arc<dyn MediaStore>,
        storage: Arc<dyn ObjectStorage>,
        download_url_ttl: Duration,
        default_page_size: i64,
        max_page_size: i64,
    ) -> Self {
        Self {
            media,
            storage,
            download_url_ttl,
            default_page_size,
            max_page_size,
        }
    }

    #[tracing::instrument(skip(self, cursor), fields(operation = "list_media"))]
    pub async fn list(
        &self,
        cursor: Option<&str>,
        limit: Option<i64>,
    ) -> Result<MediaPage, AppError> {
        let position = cursor.map(ScanPosition::decode).transpose()?;
        let limit = limit
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size);

        let scan = self.media.scan_completed(position, limit).await?;
        let total = self.media.count_completed().await?;

        let mut media = Vec::with_capacity(scan.records.len());
        for record in scan.records {
            let url = self
                .storage
                .presigned_get_url(&record.storage_key, self.download_url_ttl)
                .await?;
            media.push(MediaView::from_record(record, url));
        }

        let next_cursor = scan.last_position.map(|p| p.encode());

        tracing::debug!(
            page_len = media.len(),
            has_more = scan.has_more,
            total = total,
            "Listed media page"
        );

        Ok(MediaPage {
            media,
            next_cursor,
            has_more: scan.has_more,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use gala_core::models::{MediaKind, MediaRecord, MediaStatus};
    use gala_db::MemoryMediaStore;
    use gala_storage::MemoryStorage;
    use uuid::Uuid;

    fn service(media: Arc<MemoryMediaStore>) -> MediaListingService {
        MediaListingService::new(
            media,
            Arc::new(MemoryStorage::default()),
            Duration::from_secs(3600),
            20,
            100,
        )
    }

    async fn seed(media: &MemoryMediaStore, n: usize, status: MediaStatus) {
        let base = Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap();
        for i in 0..n {
            let id = Uuid::new_v4();
            media
                .put(&MediaRecord {
                    id,
                    file_name: format!("photo-{}.jpg", i),
                    file_type: if i % 3 == 0 {
                        "video/mp4".to_string()
                    } else {
                        "image/jpeg".to_string()
                    },
                    file_size: 1024,
                    storage_key: format!("uploads/2025-06-14/{}-photo-{}.jpg", id, i),
                    guest_id: Uuid::new_v4(),
                    guest_name: "Alex".to_string(),
                    uploaded_at: base + ChronoDuration::seconds(i as i64),
                    status,
                    completed_at: None,
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn pending_records_are_invisible() {
        let media = Arc::new(MemoryMediaStore::new());
        seed(&media, 3, MediaStatus::Pending).await;
        seed(&media, 2, MediaStatus::Completed).await;

        let page = service(media).list(None, None).await.unwrap();
        assert_eq!(page.media.len(), 2);
        assert_eq!(page.total, 2);
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn views_carry_signed_urls_and_kinds() {
        let media = Arc::new(MemoryMediaStore::new());
        seed(&media, 3, MediaStatus::Completed).await;

        let page = service(media).list(None, None).await.unwrap();
        for view in &page.media {
            assert!(view.url.contains("expires="), "URL not signed: {}", view.url);
        }
        assert!(page
            .media
            .iter()
            .any(|v| matches!(v.kind, MediaKind::Video)));
    }

    #[tokio::test]
    async fn has_more_iff_next_cursor() {
        let media = Arc::new(MemoryMediaStore::new());
        seed(&media, 5, MediaStatus::Completed).await;
        let svc = service(media);

        let first = svc.list(None, Some(3)).await.unwrap();
        assert!(first.has_more);
        assert!(first.next_cursor.is_some());

        let second = svc
            .list(first.next_cursor.as_deref(), Some(3))
            .await
            .unwrap();
        assert!(!second.has_more);
        assert!(second.next_cursor.is_none());
        assert_eq!(first.media.len() + second.media.len(), 5);
    }

    #[tokio::test]
    async fn pages_are_newest_first() {
        let media = Arc::new(MemoryMediaStore::new());
        seed(&media, 10, MediaStatus::Completed).await;

        let page = service(media).list(None, Some(10)).await.unwrap();
        for pair in page.media.windows(2) {
            assert!(pair[0].uploaded_at >= pair[1].uploaded_at);
        }
        assert_eq!(page.media[0].name, "photo-9.jpg");
    }

    #[tokio::test]
    async fn malformed_cursor_is_rejected() {
        let media = Arc::new(MemoryMediaStore::new());
        let err = service(media)
            .list(Some("!!definitely-not-a-cursor!!"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn limit_is_clamped() {
        let media = Arc::new(MemoryMediaStore::new());
        seed(&media, 4, MediaStatus::Completed).await;
        let svc = service(media);

        // A zero or negative limit falls back to a single-item page, not an error.
        let page = svc.list(None, Some(0)).await.unwrap();
        assert_eq!(page.media.len(), 1);

        let page = svc.list(None, Some(10_000)).await.unwrap();
        assert_eq!(page.media.len(), 4);
    }
}
