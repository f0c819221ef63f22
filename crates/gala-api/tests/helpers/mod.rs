//! Test helpers: build the router against in-memory backends.
//!
//! Run from the workspace root: `cargo test -p gala-api --test media_test`.
//! No external services are required; the memory stores stand in for
//! Postgres and S3 behind the same capability traits.

use axum_test::TestServer;
use gala_api::setup::routes::setup_routes;
use gala_api::state::AppState;
use gala_core::Config;
use gala_db::{MemoryGuestStore, MemoryMediaStore};
use gala_storage::MemoryStorage;
use std::sync::Arc;

pub struct TestApp {
    pub server: TestServer,
    pub media_store: Arc<MemoryMediaStore>,
    pub guest_store: Arc<MemoryGuestStore>,
    pub storage: Arc<MemoryStorage>,
}

pub fn setup_test_app() -> TestApp {
    let config = Config::for_memory_backends();

    let media_store = Arc::new(MemoryMediaStore::new());
    let guest_store = Arc::new(MemoryGuestStore::new());
    let storage = Arc::new(MemoryStorage::default());

    let state = Arc::new(AppState::new(
        config.clone(),
        media_store.clone(),
        guest_store.clone(),
        storage.clone(),
    ));

    let router = setup_routes(&config, state).expect("router setup");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        media_store,
        guest_store,
        storage,
    }
}
