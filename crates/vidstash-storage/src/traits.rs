//! Storage abstraction trait
//!
//! This module defines the DataStore trait that all binary-payload backends
//! must implement.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No data stored for video {0}")]
    NotFound(i64),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stored payload: the bytes plus the content type recorded at save time.
#[derive(Debug, Clone)]
pub struct DataObject {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Binary payload store, keyed by video id.
///
/// Saving to an id that already has data overwrites the previous payload;
/// the store keeps exactly one payload per video.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Consume `reader` fully and store its bytes for `id`.
    /// Returns the number of bytes written.
    async fn save(
        &self,
        id: i64,
        content_type: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64>;

    /// The stored payload for `id`, or `StorageError::NotFound`.
    async fn load(&self, id: i64) -> StorageResult<DataObject>;

    /// Whether a payload exists for `id`.
    async fn exists(&self, id: i64) -> StorageResult<bool>;

    /// Remove the payload for `id`; removing absent data is a no-op.
    async fn delete(&self, id: i64) -> StorageResult<()>;
}
