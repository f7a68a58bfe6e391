//! Local Filesystem Object Storage Adapter.
//!
//! Stores uploaded media under a root directory, mirroring the object key as
//! a relative path. Objects are served by a static file server or CDN at
//! `public_base_url`.
//!
//! # Atomic Writes
//!
//! Content is written to `{key}.tmp`, synced, then renamed into place so a
//! crash never leaves a truncated object behind.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::media::MediaKey;
use crate::ports::{ObjectStorage, StorageError};

#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root_dir: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Filesystem path for a key. `MediaKey` guarantees no traversal segments.
    fn object_path(&self, key: &MediaKey) -> PathBuf {
        self.root_dir.join(key.as_str())
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(&self, key: &MediaKey, bytes: &[u8], content_type: &str) -> Result<(), StorageError> {
        let final_path = self.object_path(key);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::io(format!("Failed to create directory {}: {}", parent.display(), e))
            })?;
        }

        let mut temp_name = final_path.clone().into_os_string();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            StorageError::io(format!("Failed to create temp file {}: {}", temp_path.display(), e))
        })?;
        file.write_all(bytes).await.map_err(|e| {
            StorageError::io(format!("Failed to write temp file {}: {}", temp_path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::io(format!("Failed to sync temp file {}: {}", temp_path.display(), e))
        })?;
        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            StorageError::io(format!("Failed to move object into place {}: {}", final_path.display(), e))
        })?;

        tracing::debug!(key = %key, bytes = bytes.len(), content_type, "Stored media object");
        Ok(())
    }

    async fn delete(&self, key: &MediaKey) -> Result<(), StorageError> {
        match fs::remove_file(self.object_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::not_found(key.as_str())),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, key: &MediaKey) -> String {
        format!("{}/{}", self.public_base_url, key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::media::MediaType;
    use tempfile::TempDir;

    fn create_storage() -> (LocalObjectStorage, TempDir) {
        let temp = TempDir::new().unwrap();
        let storage = LocalObjectStorage::new(temp.path(), "https://cdn.example.com/");
        (storage, temp)
    }

    #[tokio::test]
    async fn put_writes_object_under_key_path() {
        let (storage, temp) = create_storage();
        let key = MediaKey::generate(MediaType::Png, Timestamp::now());

        storage.put(&key, b"\x89PNG", "image/png").await.unwrap();

        let on_disk = std::fs::read(temp.path().join(key.as_str())).unwrap();
        assert_eq!(on_disk, b"\x89PNG");
    }

    #[tokio::test]
    async fn put_leaves_no_temp_file() {
        let (storage, temp) = create_storage();
        let key = MediaKey::parse("media/2024/01/a.pdf").unwrap();
        storage.put(&key, b"%PDF", "application/pdf").await.unwrap();

        let dir = temp.path().join("media/2024/01");
        let names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdf".to_string()]);
    }

    #[tokio::test]
    async fn delete_removes_object() {
        let (storage, temp) = create_storage();
        let key = MediaKey::parse("media/2024/01/b.gif").unwrap();
        storage.put(&key, b"GIF89a", "image/gif").await.unwrap();

        storage.delete(&key).await.unwrap();
        assert!(!temp.path().join(key.as_str()).exists());
    }

    #[tokio::test]
    async fn delete_missing_object_is_not_found() {
        let (storage, _temp) = create_storage();
        let key = MediaKey::parse("media/2024/01/missing.png").unwrap();
        let err = storage.delete(&key).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn public_url_joins_base_and_key() {
        let (storage, _temp) = create_storage();
        let key = MediaKey::parse("media/2024/01/c.webp").unwrap();
        assert_eq!(
            storage.public_url(&key),
            "https://cdn.example.com/media/2024/01/c.webp"
        );
    }
}
