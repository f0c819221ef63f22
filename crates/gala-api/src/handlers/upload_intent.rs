use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::SideEffect;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use gala_core::models::{UploadIntentRequest, UploadIntentResponse};
use std::sync::Arc;

/// Create an upload intent: mints a pending media record and returns a
/// presigned URL for the direct upload.
#[utoipa::path(
    post,
    path = "/api/v0/media",
    tag = "media",
    request_body = UploadIntentRequest,
    responses(
        (status = 200, description = "Upload intent created", body = UploadIntentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        file_name = %request.file_name,
        operation = "create_upload_intent"
    )
)]
pub async fn create_upload_intent(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UploadIntentRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let intent = state.intents.create_intent(&request).await?;

    if let SideEffect::Failed(ref reason) = intent.guest_outcome {
        // Already logged inside the service; surface at the request level too.
        tracing::debug!(media_id = %intent.media_id, reason = %reason, "Guest bookkeeping degraded");
    }

    Ok(Json(UploadIntentResponse {
        upload_url: intent.upload_url,
        media_id: intent.media_id,
        storage_key: intent.storage_key,
    }))
}
