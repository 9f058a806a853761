//! Media store configuration.
//!
//! The media root and the public URL prefix are configuration values handed
//! to [`crate::MediaStore`] at construction. They are loaded from
//! environment variables with defaults suitable for local development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Default directory uploads are written under.
pub const DEFAULT_ROOT_DIR: &str = "upload";

/// Default prefix of public file URLs.
pub const DEFAULT_URL_PREFIX: &str = "media";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Media store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaConfig {
    /// Directory every folder and file lives under.
    pub root_dir: PathBuf,

    /// Prefix of public URLs, e.g. `media` gives `media/a/b/photo.png`.
    pub url_prefix: String,
}

impl Default for MediaConfig {
    /// Returns configuration suitable for local development.
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_ROOT_DIR),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
        }
    }
}

impl MediaConfig {
    /// Create a configuration for an explicit root.
    pub fn new(root_dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `EASYBASE_MEDIA_ROOT`: Media root directory (default: upload)
    /// - `EASYBASE_MEDIA_URL_PREFIX`: Public URL prefix (default: media)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            root_dir: std::env::var("EASYBASE_MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(default.root_dir),
            url_prefix: std::env::var("EASYBASE_MEDIA_URL_PREFIX").unwrap_or(default.url_prefix),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "EASYBASE_MEDIA_ROOT".to_string(),
                message: "media root must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Public URL of a file stored under `file_path` (slash-delimited,
    /// starting and ending with `/`).
    pub fn file_url(&self, file_path: &str, file_name: &str) -> String {
        format!("{}{}{}", self.url_prefix, file_path, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MediaConfig::default();
        assert_eq!(config.root_dir, PathBuf::from("upload"));
        assert_eq!(config.url_prefix, "media");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_url() {
        let config = MediaConfig::default();
        assert_eq!(config.file_url("/a/b/", "photo.png"), "media/a/b/photo.png");
        assert_eq!(config.file_url("/", "photo.png"), "media/photo.png");
    }

    #[test]
    fn test_validate_rejects_empty_root() {
        let config = MediaConfig::new("", "media");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_from_env_overrides() {
        std::env::set_var("EASYBASE_MEDIA_ROOT", "/srv/easybase/media");
        std::env::set_var("EASYBASE_MEDIA_URL_PREFIX", "https://cdn.example.com");

        let config = MediaConfig::from_env();
        assert_eq!(config.root_dir, PathBuf::from("/srv/easybase/media"));
        assert_eq!(config.url_prefix, "https://cdn.example.com");

        std::env::remove_var("EASYBASE_MEDIA_ROOT");
        std::env::remove_var("EASYBASE_MEDIA_URL_PREFIX");
    }
}
