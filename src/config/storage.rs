//! Object storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Local-filesystem media storage.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Prefix for public object URLs, e.g. a CDN origin.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__ROOT_DIR"));
        }
        if !self.public_base_url.starts_with("http://") && !self.public_base_url.starts_with("https://") {
            return Err(ValidationError::InvalidPublicBaseUrl);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./data/uploads")
}

fn default_public_base_url() -> String {
    "http://localhost:8080/uploads".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(StorageConfig::default().validate().is_ok());
    }

    #[test]
    fn base_url_needs_scheme() {
        let config = StorageConfig {
            public_base_url: "cdn.example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPublicBaseUrl));
    }
}
