//! Shared HTTP client for the Gala API.
//!
//! Provides a minimal client with generic GET/POST/PATCH helpers, domain
//! methods for the upload protocol (`api` module), and the client-side
//! upload orchestrator (`uploader` module). The CLI uses this client
//! directly; so can any other Rust consumer.

pub mod api;
pub mod uploader;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// API version prefix (e.g. "/api/v0"). Set GALA_API_VERSION to match the server.
pub fn api_prefix() -> String {
    let version = std::env::var("GALA_API_VERSION").unwrap_or_else(|_| "v0".to_string());
    format!("/api/{}", version)
}

/// HTTP client for the Gala API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: GALA_API_URL (or API_URL).
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("GALA_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);

        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.context("Failed to send request")?;
        Self::parse_json(response).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;
        Self::parse_json(response).await
    }

    /// PATCH JSON body and deserialize response.
    pub async fn patch_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        let response = self
            .client
            .patch(&url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;
        Self::parse_json(response).await
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse response as JSON")
    }

    /// Raw client for custom requests (e.g. the direct PUT to a presigned URL).
    pub fn client(&self) -> &Client {
        &self.client
    }
}

// Re-export commonly used types for convenience.
pub use gala_core::models::{MediaPage, MediaView, UploadIntentResponse};
pub use uploader::{
    BatchReport, LocalGallery, PendingFile, UploadError, UploadPhase, UploadStep, UploadedMedia,
    Uploader,
};
