use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Two-phase upload state of a media record.
///
/// A record is created `pending` at intent time and moves to `completed`
/// exactly once, after the client confirms the direct upload. The transition
/// never reverses, and only `completed` records are visible to listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    Pending,
    Completed,
}

impl MediaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaStatus::Pending => "pending",
            MediaStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MediaStatus::Pending),
            "completed" => Some(MediaStatus::Completed),
            _ => None,
        }
    }
}

/// Coarse media kind derived from the MIME type prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// `video/*` is video; everything else renders as an image.
    pub fn from_mime(content_type: &str) -> Self {
        if content_type.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// A media record as persisted in the metadata store.
///
/// Owned exclusively by the metadata store; the object store holds only the
/// raw bytes under `storage_key`. Created by the upload-intent service,
/// mutated only by the upload-completion service, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: Uuid,
    pub file_name: String,
    /// MIME type reported at intent time.
    pub file_type: String,
    pub file_size: i64,
    /// Deterministic object-store key: `uploads/{date}/{id}-{file_name}`.
    pub storage_key: String,
    pub guest_id: Uuid,
    pub guest_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub status: MediaStatus,
    /// Set exactly once, on the pending -> completed transition.
    pub completed_at: Option<DateTime<Utc>>,
}

impl MediaRecord {
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.file_type)
    }
}

/// A media item as returned to gallery consumers: the persisted record
/// enriched with a fresh, time-limited download URL.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaView {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Signed, time-limited download URL; minted per request, never cached.
    pub url: String,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    pub guest_name: String,
    /// Size in bytes.
    pub size: i64,
}

impl MediaView {
    /// Build a view model from a persisted record and a freshly signed URL.
    pub fn from_record(record: MediaRecord, url: String) -> Self {
        MediaView {
            id: record.id,
            kind: MediaKind::from_mime(&record.file_type),
            url,
            name: record.file_name,
            uploaded_at: record.uploaded_at,
            guest_name: record.guest_name,
            size: record.file_size,
        }
    }
}

/// One page of the gallery listing.
///
/// `next_cursor` is present if and only if `has_more` is true; `total`
/// counts completed records only, matching what listing can ever expose.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaPage {
    pub media: Vec<MediaView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
    pub total: u64,
}
