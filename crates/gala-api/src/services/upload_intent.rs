//! Upload intent creation: the first step of the two-phase write path.

use chrono::Utc;
use gala_core::models::{GuestRecord, MediaRecord, MediaStatus, UploadIntentRequest};
use gala_core::AppError;
use gala_db::{GuestStore, MediaStore};
use gala_storage::{upload_key, ObjectStorage};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

use super::guest_resolver::{GuestResolver, ResolvedGuest};

/// Outcome of a best-effort side write. Guest bookkeeping must never fail
/// the upload, so its result is carried alongside the primary success
/// instead of being silently swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    Applied,
    Failed(String),
}

/// A successfully created upload intent.
#[derive(Debug)]
pub struct IntentCreated {
    pub upload_url: String,
    pub media_id: Uuid,
    pub storage_key: String,
    /// Outcome of the guest-record refresh; informational only.
    pub guest_outcome: SideEffect,
}

/// Validates an upload request, resolves the guest, mints the pending media
/// record, and returns a presigned upload URL.
#[derive(Clone)]
pub struct UploadIntentService {
    media: Arc<dyn MediaStore>,
    guests: Arc<dyn GuestStore>,
    resolver: GuestResolver,
    storage: Arc<dyn ObjectStorage>,
    upload_url_ttl: Duration,
}

impl UploadIntentService {
    pub fn new(
        media: Arc<dyn MediaStore>,
        guests: Arc<dyn GuestStore>,
        storage: Arc<dyn ObjectStorage>,
        upload_url_ttl: Duration,
    ) -> Self {
        let resolver = GuestResolver::new(guests.clone());
        Self {
            media,
            guests,
            resolver,
            storage,
            upload_url_ttl,
        }
    }

    /// Create an upload intent.
    ///
    /// Validation is checked before any side effect; on success exactly one
    /// pending MediaRecord exists and the guest record has been created or
    /// refreshed best-effort.
    #[tracing::instrument(
        skip(self, request),
        fields(
            file_name = %request.file_name,
            file_type = %request.file_type,
            operation = "create_upload_intent"
        )
    )]
    pub async fn create_intent(
        &self,
        request: &UploadIntentRequest,
    ) -> Result<IntentCreated, AppError> {
        request.validate()?;

        let now = Utc::now();
        let resolved = self.resolver.resolve(&request.guest_name).await;

        let media_id = Uuid::new_v4();
        let storage_key = upload_key(now.date_naive(), media_id, &request.file_name)?;

        let upload_url = self
            .storage
            .presigned_put_url(&storage_key, &request.file_type, self.upload_url_ttl)
            .await?;

        let record = MediaRecord {
            id: media_id,
            file_name: request.file_name.clone(),
            file_type: request.file_type.clone(),
            file_size: request.file_size,
            storage_key: storage_key.clone(),
            guest_id: resolved.guest_id,
            guest_name: request.guest_name.clone(),
            uploaded_at: now,
            status: MediaStatus::Pending,
            completed_at: None,
        };
        self.media.put(&record).await?;

        let guest_outcome = self
            .refresh_guest(resolved, &request.guest_name, now)
            .await;

        tracing::info!(
            media_id = %media_id,
            guest_id = %resolved.guest_id,
            storage_key = %storage_key,
            "Created upload intent"
        );

        Ok(IntentCreated {
            upload_url,
            media_id,
            storage_key,
            guest_outcome,
        })
    }

    /// Persist a new guest or refresh the existing one's `last_upload`.
    /// Failures are logged and reported, never propagated.
    async fn refresh_guest(
        &self,
        resolved: ResolvedGuest,
        name: &str,
        now: chrono::DateTime<Utc>,
    ) -> SideEffect {
        let result = if resolved.existing {
            self.guests.touch_last_upload(resolved.guest_id, now).await
        } else {
            self.guests
                .put(&GuestRecord {
                    id: resolved.guest_id,
                    name: name.to_string(),
                    created_at: now,
                    last_upload: now,
                })
                .await
        };

        match result {
            Ok(()) => SideEffect::Applied,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    guest_id = %resolved.guest_id,
                    "Guest bookkeeping failed; upload continues"
                );
                SideEffect::Failed(e.to_string())
            }
        }
    }
}
