//! Application state.
//!
//! AppState aggregates the injected store clients and the service objects
//! built on top of them. Services are constructed once here and shared;
//! they hold no mutable state of their own.

use gala_core::Config;
use gala_db::{GuestStore, MediaStore};
use gala_storage::ObjectStorage;
use std::sync::Arc;
use std::time::Duration;

use crate::services::{MediaListingService, UploadCompletionService, UploadIntentService};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub media_store: Arc<dyn MediaStore>,
    pub guest_store: Arc<dyn GuestStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub intents: UploadIntentService,
    pub completions: UploadCompletionService,
    pub listings: MediaListingService,
    pub is_production: bool,
}

impl AppState {
    pub fn new(
        config: Config,
        media_store: Arc<dyn MediaStore>,
        guest_store: Arc<dyn GuestStore>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        let intents = UploadIntentService::new(
            media_store.clone(),
            guest_store.clone(),
            storage.clone(),
            Duration::from_secs(config.upload_url_ttl_secs),
        );
        let completions = UploadCompletionService::new(media_store.clone());
        let listings = MediaListingService::new(
            media_store.clone(),
            storage.clone(),
            Duration::from_secs(config.download_url_ttl_secs),
            config.default_page_size,
            config.max_page_size,
        );
        let is_production = config.is_production();

        AppState {
            config,
            media_store,
            guest_store,
            storage,
            intents,
            completions,
            listings,
            is_production,
        }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
