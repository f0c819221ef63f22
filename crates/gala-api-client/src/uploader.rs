//! Client upload orchestrator.
//!
//! Drives the three-step protocol per file: request an upload intent, PUT
//! the bytes directly to the presigned URL, confirm completion. Bytes never
//! pass through the API service. Any step failure fails the whole file;
//! a retry starts over from a fresh intent, since presigned URLs are
//! single-purpose and time-limited.
//!
//! Dropping an in-flight upload future abandons the file. No cleanup is
//! attempted: the orphaned pending record is simply never listed.

use crate::ApiClient;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use gala_core::models::{MediaKind, MediaPage, MediaView};
use std::sync::Mutex;
use uuid::Uuid;

/// A file waiting to be uploaded, with enough context to retry from scratch.
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
    pub guest_name: String,
}

/// The protocol step at which an upload failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStep {
    Intent,
    Transfer,
    Confirm,
}

/// Per-file progress: idle -> requesting-intent -> uploading-bytes ->
/// confirming -> done, with failed reachable from any step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    RequestingIntent,
    UploadingBytes,
    Confirming,
    Done,
    Failed { step: UploadStep },
}

/// A failed upload, carrying the step for targeted messaging. The caller
/// keeps the `PendingFile` and retries the full protocol for that file only.
#[derive(Debug, thiserror::Error)]
#[error("upload failed at {step:?}: {message}")]
pub struct UploadError {
    pub step: UploadStep,
    pub message: String,
}

/// A confirmed upload. `object_url` is the presigned upload URL stripped of
/// its query string: it names the stored object and serves as an optimistic
/// preview pointer until the next listing refresh supplies a signed URL.
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    pub media_id: Uuid,
    pub storage_key: String,
    pub object_url: String,
    pub file_name: String,
    pub content_type: String,
    pub size: i64,
    pub guest_name: String,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadedMedia {
    /// Optimistic gallery entry for immediate local merge.
    pub fn preview_view(&self) -> MediaView {
        MediaView {
            id: self.media_id,
            kind: MediaKind::from_mime(&self.content_type),
            url: self.object_url.clone(),
            name: self.file_name.clone(),
            uploaded_at: self.uploaded_at,
            guest_name: self.guest_name.clone(),
            size: self.size,
        }
    }
}

/// Result of driving a batch of files. Partial success is reported
/// distinctly from total failure.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<UploadedMedia>,
    pub failed: Vec<(PendingFile, UploadError)>,
}

impl BatchReport {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn is_total_failure(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }

    pub fn is_partial(&self) -> bool {
        !self.succeeded.is_empty() && !self.failed.is_empty()
    }
}

/// Drives uploads against the Gala API.
#[derive(Clone)]
pub struct Uploader {
    api: ApiClient,
}

impl Uploader {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload one file through the full three-step protocol.
    pub async fn upload_file(&self, file: &PendingFile) -> Result<UploadedMedia, UploadError> {
        self.upload_file_with_progress(file, |_| {}).await
    }

    /// Upload one file, reporting each phase transition. Progress is emitted
    /// in order and exactly once per phase; a file is `Done` only after the
    /// completion confirmation succeeded.
    pub async fn upload_file_with_progress(
        &self,
        file: &PendingFile,
        on_phase: impl Fn(UploadPhase),
    ) -> Result<UploadedMedia, UploadError> {
        let fail = |step: UploadStep, message: String| {
            on_phase(UploadPhase::Failed { step });
            tracing::warn!(
                file_name = %file.file_name,
                step = ?step,
                error = %message,
                "Upload step failed"
            );
            UploadError { step, message }
        };

        on_phase(UploadPhase::RequestingIntent);
        let intent = self
            .api
            .create_upload_intent(
                &file.file_name,
                &file.content_type,
                file.bytes.len() as i64,
                &file.guest_name,
            )
            .await
            .map_err(|e| fail(UploadStep::Intent, e.to_string()))?;

        on_phase(UploadPhase::UploadingBytes);
        let response = self
            .api
            .client()
            .put(&intent.upload_url)
            .header(reqwest::header::CONTENT_TYPE, &file.content_type)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| fail(UploadStep::Transfer, e.to_string()))?;
        if !response.status().is_success() {
            return Err(fail(
                UploadStep::Transfer,
                format!("storage returned status {}", response.status()),
            ));
        }

        on_phase(UploadPhase::Confirming);
        let confirmed = self
            .api
            .complete_upload(intent.media_id)
            .await
            .map_err(|e| fail(UploadStep::Confirm, e.to_string()))?;
        if !confirmed.success {
            return Err(fail(
                UploadStep::Confirm,
                "completion not acknowledged".to_string(),
            ));
        }

        on_phase(UploadPhase::Done);
        tracing::info!(
            file_name = %file.file_name,
            media_id = %intent.media_id,
            "Upload completed"
        );

        let object_url = intent
            .upload_url
            .split_once('?')
            .map(|(base, _)| base.to_string())
            .unwrap_or_else(|| intent.upload_url.clone());

        Ok(UploadedMedia {
            media_id: intent.media_id,
            storage_key: intent.storage_key,
            object_url,
            file_name: file.file_name.clone(),
            content_type: file.content_type.clone(),
            size: file.bytes.len() as i64,
            guest_name: file.guest_name.clone(),
            uploaded_at: Utc::now(),
        })
    }

    /// Upload with up to `attempts` tries. Each retry restarts the whole
    /// protocol with a fresh intent; presigned URLs are never reused.
    pub async fn upload_with_retries(
        &self,
        file: &PendingFile,
        attempts: u32,
    ) -> Result<UploadedMedia, UploadError> {
        let mut last_error = None;
        for attempt in 1..=attempts.max(1) {
            match self.upload_file(file).await {
                Ok(media) => return Ok(media),
                Err(e) => {
                    tracing::debug!(
                        file_name = %file.file_name,
                        attempt = attempt,
                        step = ?e.step,
                        "Upload attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.expect("at least one attempt"))
    }

    /// Drive many files concurrently as independent tasks. Files share no
    /// state; one failure never blocks the others.
    pub async fn upload_all(&self, files: Vec<PendingFile>) -> BatchReport {
        let tasks = files.into_iter().map(|file| {
            let uploader = self.clone();
            async move {
                let result = uploader.upload_file(&file).await;
                (file, result)
            }
        });

        let mut report = BatchReport::default();
        for (file, result) in futures::future::join_all(tasks).await {
            match result {
                Ok(media) => report.succeeded.push(media),
                Err(error) => report.failed.push((file, error)),
            }
        }
        report
    }
}

/// Append-only local gallery, deduplicated by media id.
///
/// Updates are serialized behind a lock; re-delivery of the same media id
/// (optimistic preview first, listing refresh later) is a no-op.
#[derive(Debug, Default)]
pub struct LocalGallery {
    items: Mutex<Vec<MediaView>>,
}

impl LocalGallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one item. Returns false if the id was already present.
    pub fn merge(&self, view: MediaView) -> bool {
        let mut items = self.items.lock().expect("gallery lock");
        if items.iter().any(|existing| existing.id == view.id) {
            return false;
        }
        items.push(view);
        true
    }

    /// Merge a listing page; returns how many items were new.
    pub fn merge_page(&self, page: &MediaPage) -> usize {
        page.media
            .iter()
            .filter(|view| self.merge((*view).clone()))
            .count()
    }

    /// Current contents, newest first.
    pub fn snapshot(&self) -> Vec<MediaView> {
        let mut items = self.items.lock().expect("gallery lock").clone();
        items.sort_by(|a, b| (b.uploaded_at, b.id).cmp(&(a.uploaded_at, a.id)));
        items
    }

    pub fn len(&self) -> usize {
        self.items.lock().expect("gallery lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn view(id: Uuid, seconds: i64) -> MediaView {
        MediaView {
            id,
            kind: MediaKind::Image,
            url: "https://storage.test/x?expires=1".to_string(),
            name: "photo.jpg".to_string(),
            uploaded_at: Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap()
                + chrono::Duration::seconds(seconds),
            guest_name: "Alex".to_string(),
            size: 1024,
        }
    }

    #[test]
    fn merge_deduplicates_by_id() {
        let gallery = LocalGallery::new();
        let id = Uuid::new_v4();

        assert!(gallery.merge(view(id, 0)));
        assert!(!gallery.merge(view(id, 5)));
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn snapshot_is_newest_first() {
        let gallery = LocalGallery::new();
        let older = view(Uuid::new_v4(), 0);
        let newer = view(Uuid::new_v4(), 10);
        gallery.merge(older.clone());
        gallery.merge(newer.clone());

        let snapshot = gallery.snapshot();
        assert_eq!(snapshot[0].id, newer.id);
        assert_eq!(snapshot[1].id, older.id);
    }

    #[test]
    fn merge_page_counts_only_new_items() {
        let gallery = LocalGallery::new();
        let shared = view(Uuid::new_v4(), 1);
        gallery.merge(shared.clone());

        let page = MediaPage {
            media: vec![shared, view(Uuid::new_v4(), 2)],
            next_cursor: None,
            has_more: false,
            total: 2,
        };
        assert_eq!(gallery.merge_page(&page), 1);
        assert_eq!(gallery.len(), 2);
    }

    #[test]
    fn preview_view_derives_kind_from_mime() {
        let media = UploadedMedia {
            media_id: Uuid::new_v4(),
            storage_key: "uploads/2025-06-14/x-clip.mp4".to_string(),
            object_url: "https://storage.test/uploads/2025-06-14/x-clip.mp4".to_string(),
            file_name: "clip.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            size: 2048,
            guest_name: "Riley".to_string(),
            uploaded_at: Utc::now(),
        };
        let preview = media.preview_view();
        assert_eq!(preview.kind, MediaKind::Video);
        assert!(!preview.url.contains('?'));
    }

    #[test]
    fn batch_report_classification() {
        let ok = UploadedMedia {
            media_id: Uuid::new_v4(),
            storage_key: "k".to_string(),
            object_url: "u".to_string(),
            file_name: "a.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            size: 1,
            guest_name: "Alex".to_string(),
            uploaded_at: Utc::now(),
        };
        let failed = (
            PendingFile {
                file_name: "b.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                bytes: Bytes::from_static(b"x"),
                guest_name: "Alex".to_string(),
            },
            UploadError {
                step: UploadStep::Transfer,
                message: "boom".to_string(),
            },
        );

        let partial = BatchReport {
            succeeded: vec![ok.clone()],
            failed: vec![failed],
        };
        assert!(partial.is_partial());
        assert!(!partial.is_total_failure());
        assert!(!partial.is_complete_success());

        let success = BatchReport {
            succeeded: vec![ok],
            failed: vec![],
        };
        assert!(success.is_complete_success());
        assert!(!success.is_partial());
    }
}
