//! Upload completion: the pending -> completed transition.

use chrono::Utc;
use gala_core::AppError;
use gala_db::{CompletionOutcome, MediaStore};
use std::sync::Arc;
use uuid::Uuid;

/// Confirms that a direct upload finished, transitioning the media record to
/// completed. Confirmation is idempotent: repeat calls and unknown ids are
/// accepted silently so network retries are always safe.
#[derive(Clone)]
pub struct UploadCompletionService {
    media: Arc<dyn MediaStore>,
}

impl UploadCompletionService {
    pub fn new(media: Arc<dyn MediaStore>) -> Self {
        Self { media }
    }

    #[tracing::instrument(skip(self), fields(media_id = %media_id, operation = "complete_upload"))]
    pub async fn complete(&self, media_id: Uuid) -> Result<CompletionOutcome, AppError> {
        if media_id.is_nil() {
            return Err(AppError::InvalidInput("mediaId is required".to_string()));
        }

        let outcome = self.media.complete(media_id, Utc::now()).await?;

        match outcome {
            CompletionOutcome::Completed => {
                tracing::info!(media_id = %media_id, "Upload completed");
            }
            CompletionOutcome::AlreadyCompleted => {
                tracing::debug!(media_id = %media_id, "Repeat completion confirmed as no-op");
            }
            CompletionOutcome::Unknown => {
                tracing::debug!(media_id = %media_id, "Completion for unknown media id accepted");
            }
        }

        Ok(outcome)
    }
}
