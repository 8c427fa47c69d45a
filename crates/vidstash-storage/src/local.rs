use std::path::{Path, PathBuf};
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::traits::{DataObject, DataStore, StorageError, StorageResult};

/// Local filesystem payload store.
///
/// Each video gets one data file plus a sidecar recording the content type:
/// `<base>/video-<id>.dat` and `<base>/video-<id>.meta`. Saving truncates
/// any previous payload for the same id.
#[derive(Clone)]
pub struct LocalDataStore {
    base_path: PathBuf,
}

impl LocalDataStore {
    /// Create the store, ensuring the base directory exists.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::Config(format!(
                "Failed to create data directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalDataStore { base_path })
    }

    fn data_path(&self, id: i64) -> PathBuf {
        self.base_path.join(format!("video-{}.dat", id))
    }

    fn meta_path(&self, id: i64) -> PathBuf {
        self.base_path.join(format!("video-{}.meta", id))
    }

    async fn remove_if_present(path: &Path) -> StorageResult<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl DataStore for LocalDataStore {
    async fn save(
        &self,
        id: i64,
        content_type: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let data_path = self.data_path(id);

        let mut file = fs::File::create(&data_path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", data_path.display(), e)))?;
        let written = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", data_path.display(), e)))?;
        file.flush().await?;

        fs::write(self.meta_path(id), content_type).await?;

        tracing::debug!(video_id = id, bytes = written, path = %data_path.display(), "Saved video data");
        Ok(written)
    }

    async fn load(&self, id: i64) -> StorageResult<DataObject> {
        let bytes = match fs::read(self.data_path(id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(id));
            }
            Err(e) => return Err(StorageError::ReadFailed(e.to_string())),
        };

        let content_type = match fs::read_to_string(self.meta_path(id)).await {
            Ok(ct) => ct,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "application/octet-stream".to_string()
            }
            Err(e) => return Err(StorageError::ReadFailed(e.to_string())),
        };

        Ok(DataObject {
            bytes: Bytes::from(bytes),
            content_type,
        })
    }

    async fn exists(&self, id: i64) -> StorageResult<bool> {
        Ok(fs::try_exists(self.data_path(id)).await?)
    }

    async fn delete(&self, id: i64) -> StorageResult<()> {
        Self::remove_if_present(&self.data_path(id)).await?;
        Self::remove_if_present(&self.meta_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &[u8]) -> Pin<Box<dyn AsyncRead + Send + Unpin>> {
        Box::pin(std::io::Cursor::new(data.to_vec()))
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDataStore::new(dir.path()).await.unwrap();

        let written = store.save(1, "video/mp4", reader(b"payload")).await.unwrap();
        assert_eq!(written, 7);
        assert!(store.exists(1).await.unwrap());

        let obj = store.load(1).await.unwrap();
        assert_eq!(obj.bytes.as_ref(), b"payload");
        assert_eq!(obj.content_type, "video/mp4");
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDataStore::new(dir.path()).await.unwrap();

        store.save(1, "video/mp4", reader(b"a longer first payload")).await.unwrap();
        store.save(1, "video/mp4", reader(b"short")).await.unwrap();

        let obj = store.load(1).await.unwrap();
        assert_eq!(obj.bytes.as_ref(), b"short");
    }

    #[tokio::test]
    async fn test_load_absent_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDataStore::new(dir.path()).await.unwrap();

        assert!(matches!(store.load(9).await, Err(StorageError::NotFound(9))));
    }

    #[tokio::test]
    async fn test_delete_removes_data_and_meta() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDataStore::new(dir.path()).await.unwrap();

        store.save(1, "video/mp4", reader(b"payload")).await.unwrap();
        store.delete(1).await.unwrap();

        assert!(!store.exists(1).await.unwrap());
        assert!(!fs::try_exists(store.meta_path(1)).await.unwrap());
        // Idempotent on absent data.
        store.delete(1).await.unwrap();
    }
}
