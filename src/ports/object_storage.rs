//! Object storage port for uploaded media.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::media::MediaKey;

/// Errors that can occur during object storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Object not found: {key}")]
    NotFound { key: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl StorageError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::not_found(err.to_string()),
            _ => StorageError::io(err.to_string()),
        }
    }
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores the bytes under `key`, replacing any existing object.
    async fn put(&self, key: &MediaKey, bytes: &[u8], content_type: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// - `NotFound` if no object exists under `key`
    async fn delete(&self, key: &MediaKey) -> Result<(), StorageError>;

    /// Public URL at which the object is served.
    fn public_url(&self, key: &MediaKey) -> String;
}
