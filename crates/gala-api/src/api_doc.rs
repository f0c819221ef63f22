//! OpenAPI documentation.

use axum::Json;
use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use gala_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gala API",
        version = "0.1.0",
        description = "Event-gallery media API: presigned-URL uploads with completion confirmation and a cursor-paginated gallery listing. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::upload_intent::create_upload_intent,
        handlers::upload_complete::complete_upload,
        handlers::media_list::list_media,
    ),
    components(schemas(
        models::upload::UploadIntentRequest,
        models::upload::UploadIntentResponse,
        models::upload::CompleteUploadRequest,
        models::upload::CompleteUploadResponse,
        models::media::MediaView,
        models::media::MediaPage,
        models::media::MediaKind,
        models::media::MediaStatus,
        error::ErrorResponse,
    )),
    tags(
        (name = "media", description = "Upload intents, completion confirmation, and gallery listing")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI spec as JSON.
pub async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
