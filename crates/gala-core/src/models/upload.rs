use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request to open an upload intent: mints a pending media record and a
/// presigned URL for the direct upload.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadIntentRequest {
    /// Original filename
    #[validate(length(
        min = 1,
        max = 255,
        message = "fileName must be between 1 and 255 characters"
    ))]
    pub file_name: String,
    /// Content type (MIME type)
    #[validate(length(
        min = 1,
        max = 255,
        message = "fileType must be between 1 and 255 characters"
    ))]
    pub file_type: String,
    /// File size in bytes
    #[validate(range(min = 1, message = "fileSize must be at least 1 byte"))]
    pub file_size: i64,
    /// Self-reported display name of the uploading guest
    #[validate(length(
        min = 1,
        max = 255,
        message = "guestName must be between 1 and 255 characters"
    ))]
    pub guest_name: String,
}

/// Response containing the presigned upload URL and record identifiers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadIntentResponse {
    /// Presigned URL for the direct PUT upload (1 hour validity)
    pub upload_url: String,
    /// Media ID (used to confirm completion)
    pub media_id: Uuid,
    /// Object-store key where the bytes will land
    pub storage_key: String,
}

/// Request to confirm a direct upload finished.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadRequest {
    /// Media ID from the upload-intent response
    pub media_id: Uuid,
}

/// Response after confirming completion. Confirmation is idempotent: repeat
/// calls and unknown ids both report success.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompleteUploadResponse {
    pub success: bool,
}
