//! Media protocol integration tests.
//!
//! Exercises the three-step upload protocol and the paginated listing over
//! the HTTP surface, with the direct PUT simulated against the in-memory
//! object store.

mod helpers;

use bytes::Bytes;
use chrono::{Duration, TimeZone, Utc};
use gala_core::models::{
    CompleteUploadResponse, MediaPage, MediaRecord, MediaStatus, UploadIntentResponse,
};
use gala_db::MediaStore;
use gala_storage::ObjectStorage;
use helpers::setup_test_app;
use std::collections::HashSet;
use uuid::Uuid;

fn intent_body(file_name: &str, file_type: &str, file_size: i64, guest: &str) -> serde_json::Value {
    serde_json::json!({
        "fileName": file_name,
        "fileType": file_type,
        "fileSize": file_size,
        "guestName": guest,
    })
}

async fn seed_completed(app: &helpers::TestApp, n: usize) -> Vec<Uuid> {
    let base = Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap();
    let mut ids = Vec::new();
    for i in 0..n {
        let id = Uuid::new_v4();
        ids.push(id);
        app.media_store
            .put(&MediaRecord {
                id,
                file_name: format!("photo-{}.jpg", i),
                file_type: "image/jpeg".to_string(),
                file_size: 1024,
                storage_key: format!("uploads/2025-06-14/{}-photo-{}.jpg", id, i),
                guest_id: Uuid::new_v4(),
                guest_name: "Alex".to_string(),
                uploaded_at: base + Duration::seconds(i as i64),
                status: MediaStatus::Completed,
                completed_at: Some(base + Duration::seconds(i as i64)),
            })
            .await
            .unwrap();
    }
    ids
}

#[tokio::test]
async fn full_upload_protocol() {
    let app = setup_test_app();

    // Step 1: request an upload intent.
    let response = app
        .server
        .post("/api/v0/media")
        .json(&intent_body("cake.jpg", "image/jpeg", 204_800, "Alex"))
        .await;
    assert_eq!(response.status_code(), 200);
    let intent: UploadIntentResponse = response.json();

    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    assert_eq!(
        intent.storage_key,
        format!("uploads/{}/{}-cake.jpg", today, intent.media_id)
    );
    assert!(intent.upload_url.contains(&intent.storage_key));

    // The record is pending and invisible to listing.
    let record = app
        .media_store
        .get(intent.media_id)
        .await
        .unwrap()
        .expect("pending record persisted");
    assert_eq!(record.status, MediaStatus::Pending);

    let page: MediaPage = app.server.get("/api/v0/media").await.json();
    assert!(page.media.is_empty());
    assert_eq!(page.total, 0);

    // Step 2: the direct PUT, simulated against the object store.
    app.storage
        .put(&intent.storage_key, Bytes::from_static(b"jpeg"), "image/jpeg")
        .await
        .unwrap();

    // Step 3: confirm completion.
    let response = app
        .server
        .patch("/api/v0/media")
        .json(&serde_json::json!({ "mediaId": intent.media_id }))
        .await;
    assert_eq!(response.status_code(), 200);
    let completed: CompleteUploadResponse = response.json();
    assert!(completed.success);

    // The gallery now shows the item with a fresh signed URL.
    let page: MediaPage = app.server.get("/api/v0/media").await.json();
    assert_eq!(page.media.len(), 1);
    assert_eq!(page.total, 1);
    assert!(!page.has_more);
    assert!(page.next_cursor.is_none());

    let item = &page.media[0];
    assert_eq!(item.id, intent.media_id);
    assert_eq!(item.name, "cake.jpg");
    assert_eq!(item.guest_name, "Alex");
    assert_eq!(item.size, 204_800);
    assert!(item.url.contains("expires="));
    let json = serde_json::to_value(item).unwrap();
    assert_eq!(json["type"], "image");
}

#[tokio::test]
async fn validation_failure_persists_nothing() {
    let app = setup_test_app();

    let response = app
        .server
        .post("/api/v0/media")
        .json(&intent_body("cake.jpg", "image/jpeg", 0, "Alex"))
        .await;
    assert_eq!(response.status_code(), 400);

    // Missing guestName entirely.
    let response = app
        .server
        .post("/api/v0/media")
        .json(&serde_json::json!({
            "fileName": "cake.jpg",
            "fileType": "image/jpeg",
            "fileSize": 100,
        }))
        .await;
    assert_eq!(response.status_code(), 400);

    assert!(app.media_store.is_empty().await);
    assert!(app.guest_store.is_empty().await);
    assert_eq!(app.storage.object_count().await, 0);
}

#[tokio::test]
async fn completion_of_unknown_id_succeeds() {
    let app = setup_test_app();

    let response = app
        .server
        .patch("/api/v0/media")
        .json(&serde_json::json!({ "mediaId": Uuid::new_v4() }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: CompleteUploadResponse = response.json();
    assert!(body.success);
}

#[tokio::test]
async fn completion_is_idempotent_over_http() {
    let app = setup_test_app();

    let intent: UploadIntentResponse = app
        .server
        .post("/api/v0/media")
        .json(&intent_body("toast.mp4", "video/mp4", 5_000_000, "Riley"))
        .await
        .json();

    for _ in 0..2 {
        let response = app
            .server
            .patch("/api/v0/media")
            .json(&serde_json::json!({ "mediaId": intent.media_id }))
            .await;
        assert_eq!(response.status_code(), 200);
    }

    let record = app
        .media_store
        .get(intent.media_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, MediaStatus::Completed);
    // Exactly one completion timestamp, set by the first confirmation.
    assert!(record.completed_at.is_some());

    let first = record.completed_at;
    app.server
        .patch("/api/v0/media")
        .json(&serde_json::json!({ "mediaId": intent.media_id }))
        .await;
    let record = app
        .media_store
        .get(intent.media_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.completed_at, first);
}

#[tokio::test]
async fn malformed_media_id_is_rejected() {
    let app = setup_test_app();

    let response = app
        .server
        .patch("/api/v0/media")
        .json(&serde_json::json!({ "mediaId": 12345 }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .server
        .patch("/api/v0/media")
        .json(&serde_json::json!({}))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn listing_never_returns_pending() {
    let app = setup_test_app();
    seed_completed(&app, 2).await;

    // A fresh intent creates a pending record.
    app.server
        .post("/api/v0/media")
        .json(&intent_body("wip.jpg", "image/jpeg", 10, "Sam"))
        .await;

    let page: MediaPage = app.server.get("/api/v0/media").await.json();
    assert_eq!(page.media.len(), 2);
    assert_eq!(page.total, 2);
    assert!(page.media.iter().all(|m| m.name != "wip.jpg"));
}

#[tokio::test]
async fn pagination_walk_is_gap_free_and_duplicate_free() {
    let app = setup_test_app();
    let ids = seed_completed(&app, 25).await;

    let mut seen: Vec<Uuid> = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let mut request = app.server.get("/api/v0/media").add_query_param("limit", "10");
        if let Some(ref c) = cursor {
            request = request.add_query_param("cursor", c.clone());
        }
        let page: MediaPage = request.await.json();

        assert_eq!(page.total, 25);
        assert_eq!(page.has_more, page.next_cursor.is_some());
        seen.extend(page.media.iter().map(|m| m.id));

        match page.next_cursor {
            Some(c) => cursor = Some(c),
            None => break,
        }
    }

    assert_eq!(seen.len(), 25);
    let unique: HashSet<Uuid> = seen.iter().copied().collect();
    assert_eq!(unique, ids.iter().copied().collect::<HashSet<Uuid>>());
    // Newest first: the last-seeded record leads the first page.
    assert_eq!(seen.first(), ids.last());
}

#[tokio::test]
async fn malformed_cursor_is_a_client_error() {
    let app = setup_test_app();
    seed_completed(&app, 1).await;

    let response = app
        .server
        .get("/api/v0/media")
        .add_query_param("cursor", "not-a-cursor")
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn cors_preflight_returns_200_with_no_body() {
    let app = setup_test_app();

    let response = app
        .server
        .method(axum::http::Method::OPTIONS, "/api/v0/media")
        .add_header("Origin", "https://gallery.example")
        .add_header("Access-Control-Request-Method", "POST")
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(response.text().is_empty());
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn cors_headers_on_simple_requests() {
    let app = setup_test_app();

    let response = app
        .server
        .get("/api/v0/media")
        .add_header("Origin", "https://gallery.example")
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn unsupported_method_is_405() {
    let app = setup_test_app();
    let response = app.server.delete("/api/v0/media").await;
    assert_eq!(response.status_code(), 405);
}

#[tokio::test]
async fn health_probes() {
    let app = setup_test_app();

    let response = app.server.get("/health/live").await;
    assert_eq!(response.status_code(), 200);

    let response = app.server.get("/health/ready").await;
    assert_eq!(response.status_code(), 200);
}
