//! Test helpers: build AppState and router for integration tests.
//!
//! Runs entirely against the in-memory backends, so no external services are
//! required. Run with: `cargo test -p vidstash-api`.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;

use vidstash_api::setup::routes;
use vidstash_api::state::AppState;
use vidstash_core::{Config, DataStoreBackend, RepositoryBackend};
use vidstash_db::InMemoryVideoRepository;
use vidstash_storage::InMemoryDataStore;

/// Public base URL the test repository derives dataUrl values from.
pub const BASE_URL: &str = "http://localhost:8080";

pub fn test_config() -> Config {
    Config {
        server_port: 8080,
        public_base_url: BASE_URL.to_string(),
        repository_backend: RepositoryBackend::Memory,
        database_url: None,
        data_store_backend: DataStoreBackend::Memory,
        data_dir: "./data/videos".to_string(),
        max_data_size_bytes: 64 * 1024 * 1024,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
    }
}

/// Build a fresh application with isolated in-memory state.
pub fn setup_test_app() -> TestServer {
    let config = test_config();
    let state = Arc::new(AppState {
        videos: Arc::new(InMemoryVideoRepository::new(config.public_base_url.clone())),
        data: Arc::new(InMemoryDataStore::new()),
        config,
    });

    let router = routes::build_router(state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to start test server")
}

/// POST a video's metadata and return the stored record as JSON.
pub async fn create_video(server: &TestServer, title: &str, duration: i64) -> serde_json::Value {
    let response = server
        .post("/video")
        .json(&serde_json::json!({
            "title": title,
            "duration": duration,
            "contentType": "video/mp4",
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    response.json()
}
