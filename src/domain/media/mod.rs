//! Media domain - uploaded files and their storage keys.
//!
//! Keys have the shape `media/{yyyy}/{mm}/{uuid}.{ext}`. Keys are validated
//! on the way in so that a client-supplied key can never escape the media
//! prefix of the object store.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Maximum upload size in bytes (10 MB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const KEY_PREFIX: &str = "media/";

/// Accepted upload content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Jpeg,
    Png,
    Webp,
    Gif,
    Pdf,
    Zip,
}

impl MediaType {
    /// Parses a `Content-Type` header value, ignoring parameters.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Some(MediaType::Jpeg),
            "image/png" => Some(MediaType::Png),
            "image/webp" => Some(MediaType::Webp),
            "image/gif" => Some(MediaType::Gif),
            "application/pdf" => Some(MediaType::Pdf),
            "application/zip" | "application/x-zip-compressed" => Some(MediaType::Zip),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Webp => "image/webp",
            MediaType::Gif => "image/gif",
            MediaType::Pdf => "application/pdf",
            MediaType::Zip => "application/zip",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "jpg",
            MediaType::Png => "png",
            MediaType::Webp => "webp",
            MediaType::Gif => "gif",
            MediaType::Pdf => "pdf",
            MediaType::Zip => "zip",
        }
    }
}

/// Validated object key under the media prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaKey(String);

impl MediaKey {
    /// Generates a fresh key for an upload made at `now`.
    pub fn generate(media_type: MediaType, now: Timestamp) -> Self {
        let (year, month) = now.year_month();
        Self(format!(
            "{}{:04}/{:02}/{}.{}",
            KEY_PREFIX,
            year,
            month,
            Uuid::new_v4(),
            media_type.extension()
        ))
    }

    /// Validates a client-supplied key.
    pub fn parse(key: &str) -> Result<Self, ValidationError> {
        let key = key.trim().trim_start_matches('/');
        let Some(rest) = key.strip_prefix(KEY_PREFIX) else {
            return Err(ValidationError::invalid_format("key", "must start with media/"));
        };
        let segments_ok = !rest.is_empty()
            && rest.split('/').all(|segment| {
                !segment.is_empty()
                    && segment != "."
                    && segment != ".."
                    && segment
                        .bytes()
                        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
            });
        if !segments_ok {
            return Err(ValidationError::invalid_format("key", "contains invalid path segments"));
        }
        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checks type and size of an upload.
pub fn validate_upload(content_type: Option<&str>, size: usize) -> Result<MediaType, ValidationError> {
    let content_type = content_type.ok_or_else(|| ValidationError::empty_field("contentType"))?;
    let media_type = MediaType::from_mime(content_type).ok_or_else(|| {
        ValidationError::invalid_format(
            "contentType",
            format!("unsupported media type '{}'", content_type),
        )
    })?;
    if size == 0 {
        return Err(ValidationError::empty_field("file"));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::out_of_range(
            "file",
            1,
            MAX_UPLOAD_BYTES as i64,
            size as i64,
        ));
    }
    Ok(media_type)
}
