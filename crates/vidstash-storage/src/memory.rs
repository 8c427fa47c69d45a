use std::collections::HashMap;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::RwLock;

use crate::traits::{DataObject, DataStore, StorageError, StorageResult};

/// In-memory payload store for tests and development.
///
/// Payloads live in a `HashMap<i64, DataObject>` behind a `RwLock`. No
/// external dependencies required.
pub struct InMemoryDataStore {
    objects: RwLock<HashMap<i64, DataObject>>,
}

impl InMemoryDataStore {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataStore for InMemoryDataStore {
    async fn save(
        &self,
        id: i64,
        content_type: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        let written = buf.len() as u64;

        let mut objects = self.objects.write().await;
        objects.insert(
            id,
            DataObject {
                bytes: Bytes::from(buf),
                content_type: content_type.to_string(),
            },
        );
        Ok(written)
    }

    async fn load(&self, id: i64) -> StorageResult<DataObject> {
        let objects = self.objects.read().await;
        objects.get(&id).cloned().ok_or(StorageError::NotFound(id))
    }

    async fn exists(&self, id: i64) -> StorageResult<bool> {
        Ok(self.objects.read().await.contains_key(&id))
    }

    async fn delete(&self, id: i64) -> StorageResult<()> {
        self.objects.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &[u8]) -> Pin<Box<dyn AsyncRead + Send + Unpin>> {
        Box::pin(std::io::Cursor::new(data.to_vec()))
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = InMemoryDataStore::new();

        let written = store.save(1, "video/mp4", reader(b"mpeg bytes")).await.unwrap();
        assert_eq!(written, 10);

        let obj = store.load(1).await.unwrap();
        assert_eq!(obj.bytes.as_ref(), b"mpeg bytes");
        assert_eq!(obj.content_type, "video/mp4");
    }

    #[tokio::test]
    async fn test_load_absent_is_not_found() {
        let store = InMemoryDataStore::new();
        assert!(matches!(
            store.load(7).await,
            Err(StorageError::NotFound(7))
        ));
        assert!(!store.exists(7).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_payload() {
        let store = InMemoryDataStore::new();
        store.save(1, "video/mp4", reader(b"first")).await.unwrap();
        store.save(1, "video/webm", reader(b"second")).await.unwrap();

        let obj = store.load(1).await.unwrap();
        assert_eq!(obj.bytes.as_ref(), b"second");
        assert_eq!(obj.content_type, "video/webm");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryDataStore::new();
        store.save(1, "video/mp4", reader(b"x")).await.unwrap();

        store.delete(1).await.unwrap();
        assert!(!store.exists(1).await.unwrap());
        // Deleting again is a no-op.
        store.delete(1).await.unwrap();
    }
}
