//! Media errors.

use easybase_store::StoreError;
use thiserror::Error;

/// Errors raised by the media store.
///
/// No variant carries a resolved filesystem path in its message.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Folder or file does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Bad name or a clashing folder/file.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Target resolves outside the media root.
    #[error("Path is outside the media root")]
    OutsideRoot,

    /// Filesystem failure.
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata repository failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl MediaError {
    /// Create a NotFound error.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// HTTP-style status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::OutsideRoot => 403,
            Self::Io(_) | Self::Storage(_) => 500,
        }
    }
}

impl From<StoreError> for MediaError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, key: id },
            StoreError::UniqueViolation { entity, .. } => {
                Self::Validation(format!("{} already exists", entity))
            }
            StoreError::Backend(message) => Self::Storage(message),
        }
    }
}

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_root_message_is_generic() {
        let err = MediaError::OutsideRoot;
        assert_eq!(err.to_string(), "Path is outside the media root");
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_from_store_error() {
        let err: MediaError = StoreError::UniqueViolation {
            entity: "MediaFolder",
            constraint: "natural_key".into(),
        }
        .into();
        assert!(matches!(err, MediaError::Validation(ref m) if m.contains("MediaFolder")));

        let err: MediaError = StoreError::Backend("down".into()).into();
        assert_eq!(err.status_code(), 500);
    }
}
