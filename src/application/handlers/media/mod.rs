//! Media handlers - admin upload and delete of stored objects.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::media::{validate_upload, MediaKey, MediaType};
use crate::ports::{ObjectStorage, StorageError};

fn storage_error(err: StorageError) -> DomainError {
    match err {
        StorageError::NotFound { key } => {
            DomainError::new(ErrorCode::MediaNotFound, format!("Media not found: {}", key))
        }
        StorageError::Io { message } => DomainError::new(ErrorCode::StorageError, message),
    }
}

/// Best-effort removal of a stored object. Failures are logged, never returned.
pub async fn discard_object(storage: &dyn ObjectStorage, key: &str) {
    let key = match MediaKey::parse(key) {
        Ok(key) => key,
        Err(_) => {
            tracing::debug!(key, "Skipping cleanup of non-media reference");
            return;
        }
    };
    if let Err(e) = storage.delete(&key).await {
        tracing::warn!(key = %key, error = %e, "Failed to delete replaced media object");
    }
}

#[derive(Debug, Clone)]
pub struct UploadMediaCommand {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadMediaResult {
    pub key: MediaKey,
    pub url: String,
    pub media_type: MediaType,
    pub size: usize,
}

pub struct UploadMediaHandler {
    storage: Arc<dyn ObjectStorage>,
}

impl UploadMediaHandler {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    pub async fn handle(&self, cmd: UploadMediaCommand) -> Result<UploadMediaResult, DomainError> {
        let media_type = validate_upload(cmd.content_type.as_deref(), cmd.bytes.len())?;
        let key = MediaKey::generate(media_type, Timestamp::now());

        self.storage
            .put(&key, &cmd.bytes, media_type.mime())
            .await
            .map_err(storage_error)?;
        tracing::info!(key = %key, size = cmd.bytes.len(), "Media uploaded");

        Ok(UploadMediaResult {
            url: self.storage.public_url(&key),
            key,
            media_type,
            size: cmd.bytes.len(),
        })
    }
}

pub struct DeleteMediaHandler {
    storage: Arc<dyn ObjectStorage>,
}

impl DeleteMediaHandler {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    pub async fn handle(&self, key: &str) -> Result<(), DomainError> {
        let key = MediaKey::parse(key)?;
        self.storage.delete(&key).await.map_err(storage_error)?;
        tracing::info!(key = %key, "Media deleted");
        Ok(())
    }
}
