//! Capability traits for the metadata stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gala_core::cursor::ScanPosition;
use gala_core::models::{GuestRecord, MediaRecord};
use gala_core::AppError;
use uuid::Uuid;

/// Outcome of a completion attempt. None of these is an error: confirmation
/// is idempotent and a no-op for unknown ids, so network retries are safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The record moved pending -> completed.
    Completed,
    /// The record was already completed; its original completion time stands.
    AlreadyCompleted,
    /// No record matches the id; accepted silently.
    Unknown,
}

/// One page of a completed-media scan.
#[derive(Debug, Clone)]
pub struct MediaScanPage {
    /// Records in scan order: newest first by `(uploaded_at, id)`.
    pub records: Vec<MediaRecord>,
    /// Position of the last returned record, present iff more data remains.
    pub last_position: Option<ScanPosition>,
    pub has_more: bool,
}

/// Media metadata store: point writes, point lookups, and paginated scans
/// over completed records.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist a new media record.
    async fn put(&self, record: &MediaRecord) -> Result<(), AppError>;

    /// Point lookup by id.
    async fn get(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError>;

    /// Transition a record to completed, stamping `completed_at`.
    ///
    /// Only a pending record is updated; repeat calls and unknown ids report
    /// their outcome without erroring, and the first completion timestamp is
    /// never overwritten.
    async fn complete(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<CompletionOutcome, AppError>;

    /// Scan completed records newest-first, resuming after `position` when
    /// present. Returns at most `limit` records plus a continuation
    /// position iff more data remains.
    async fn scan_completed(
        &self,
        position: Option<ScanPosition>,
        limit: i64,
    ) -> Result<MediaScanPage, AppError>;

    /// Count of completed records.
    async fn count_completed(&self) -> Result<u64, AppError>;
}

/// Guest metadata store: point writes and lookups by id or display name.
#[async_trait]
pub trait GuestStore: Send + Sync {
    /// Persist a guest record (upsert by id).
    async fn put(&self, record: &GuestRecord) -> Result<(), AppError>;

    /// Point lookup by id.
    async fn get(&self, id: Uuid) -> Result<Option<GuestRecord>, AppError>;

    /// Look up a guest by exact display name.
    ///
    /// Names are not unique at the storage layer; the oldest row wins so a
    /// duplicate created by racing first uploads stays invisible here.
    async fn find_by_name(&self, name: &str) -> Result<Option<GuestRecord>, AppError>;

    /// Refresh `last_upload` for an existing guest.
    async fn touch_last_upload(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError>;
}
