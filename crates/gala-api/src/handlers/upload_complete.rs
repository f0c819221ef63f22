use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use gala_core::models::{CompleteUploadRequest, CompleteUploadResponse};
use std::sync::Arc;

/// Confirm a direct upload finished, transitioning the media record to
/// completed. Idempotent: repeat confirmations and unknown ids succeed.
#[utoipa::path(
    patch,
    path = "/api/v0/media",
    tag = "media",
    request_body = CompleteUploadRequest,
    responses(
        (status = 200, description = "Upload completion confirmed", body = CompleteUploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(media_id = %request.media_id, operation = "complete_upload")
)]
pub async fn complete_upload(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CompleteUploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.completions.complete(request.media_id).await?;

    Ok(Json(CompleteUploadResponse { success: true }))
}
