//! Application setup and initialization
//!
//! Backend selection and wiring extracted from main.rs so integration tests
//! can assemble the same application without a process.

pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;

use crate::state::AppState;
use vidstash_core::{Config, DataStoreBackend, RepositoryBackend};
use vidstash_db::{InMemoryVideoRepository, PgVideoRepository, VideoRepository};
use vidstash_storage::{DataStore, InMemoryDataStore, LocalDataStore};

const DB_MAX_CONNECTIONS: u32 = 20;
const DB_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration.
    config
        .validate()
        .context("Configuration validation failed")?;

    let videos = build_repository(&config).await?;
    let data = build_data_store(&config).await?;

    let state = Arc::new(AppState {
        videos,
        data,
        config,
    });
    let router = routes::build_router(state.clone())?;

    Ok((state, router))
}

async fn build_repository(config: &Config) -> Result<Arc<dyn VideoRepository>> {
    match config.repository_backend {
        RepositoryBackend::Memory => {
            tracing::info!("Using in-memory video repository");
            Ok(Arc::new(InMemoryVideoRepository::new(
                config.public_base_url.clone(),
            )))
        }
        RepositoryBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(DB_MAX_CONNECTIONS)
                .acquire_timeout(Duration::from_secs(DB_ACQUIRE_TIMEOUT_SECS))
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;

            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            tracing::info!("Using postgres video repository");
            Ok(Arc::new(PgVideoRepository::new(
                pool,
                config.public_base_url.clone(),
            )))
        }
    }
}

async fn build_data_store(config: &Config) -> Result<Arc<dyn DataStore>> {
    match config.data_store_backend {
        DataStoreBackend::Memory => {
            tracing::info!("Using in-memory data store");
            Ok(Arc::new(InMemoryDataStore::new()))
        }
        DataStoreBackend::Local => {
            let store = LocalDataStore::new(config.data_dir.clone()).await?;
            tracing::info!(data_dir = %config.data_dir, "Using local data store");
            Ok(Arc::new(store))
        }
    }
}
