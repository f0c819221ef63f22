use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use gala_core::models::MediaPage;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListMediaQuery {
    /// Opaque continuation cursor from a previous page
    pub cursor: Option<String>,
    /// Page size; defaults to 20, capped at the configured maximum
    pub limit: Option<i64>,
}

/// List completed media, newest first, with fresh time-limited download URLs.
#[utoipa::path(
    get,
    path = "/api/v0/media",
    tag = "media",
    params(ListMediaQuery),
    responses(
        (status = 200, description = "One page of the gallery", body = MediaPage),
        (status = 400, description = "Malformed cursor or limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "list_media"))]
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListMediaQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page: MediaPage = state
        .listings
        .list(query.cursor.as_deref(), query.limit)
        .await?;

    Ok(Json(page))
}
