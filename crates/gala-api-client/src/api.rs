//! Domain methods for the Gala API client.
//!
//! Response types come from `gala_core::models`, so the wire shapes are
//! shared with the server by construction.

use crate::{api_prefix, ApiClient};
use anyhow::Result;
use gala_core::models::{CompleteUploadResponse, MediaPage, MediaView, UploadIntentResponse};
use uuid::Uuid;

impl ApiClient {
    /// Request an upload intent: a presigned upload URL plus the media id
    /// and storage key of the freshly minted pending record.
    pub async fn create_upload_intent(
        &self,
        file_name: &str,
        file_type: &str,
        file_size: i64,
        guest_name: &str,
    ) -> Result<UploadIntentResponse> {
        let body = serde_json::json!({
            "fileName": file_name,
            "fileType": file_type,
            "fileSize": file_size,
            "guestName": guest_name,
        });
        self.post_json(&format!("{}/media", api_prefix()), &body)
            .await
    }

    /// Confirm that the direct upload for `media_id` finished.
    pub async fn complete_upload(&self, media_id: Uuid) -> Result<CompleteUploadResponse> {
        let body = serde_json::json!({ "mediaId": media_id });
        self.patch_json(&format!("{}/media", api_prefix()), &body)
            .await
    }

    /// Fetch one page of the gallery.
    pub async fn list_media(
        &self,
        cursor: Option<&str>,
        limit: Option<i64>,
    ) -> Result<MediaPage> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(c) = cursor {
            query.push(("cursor", c.to_string()));
        }
        if let Some(l) = limit {
            query.push(("limit", l.to_string()));
        }
        self.get(&format!("{}/media", api_prefix()), &query).await
    }

    /// Walk the gallery to the end, following continuation cursors.
    /// The infinite-scroll path, collapsed into one call.
    pub async fn list_all_media(&self, page_size: i64) -> Result<Vec<MediaView>> {
        let mut all = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.list_media(cursor.as_deref(), Some(page_size)).await?;
            all.extend(page.media);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(all)
    }
}
