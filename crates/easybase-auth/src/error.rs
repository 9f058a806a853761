//! Error types for guarded service operations
//!
//! This module defines the error conditions shared by every EasyBase
//! service: permission denial, missing entities, uniqueness conflicts,
//! invalid input, and storage failures.

use easybase_store::StoreError;
use thiserror::Error;

/// Service error types.
///
/// `Forbidden` is only ever produced by a permission-gated facade, before
/// any persistence access. Local services produce the remaining variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Caller lacks the permission required for the operation
    #[error("Forbidden: missing {resource_type}:{action} permission")]
    Forbidden {
        /// Resource type that was checked
        resource_type: String,
        /// Action key that was checked
        action: String,
    },

    /// Requested entity does not exist
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Entity name
        entity: &'static str,
        /// Key that was looked up
        key: String,
    },

    /// A uniqueness invariant would be violated
    #[error("{entity} already exists: {key}")]
    Conflict {
        /// Entity name
        entity: &'static str,
        /// Conflicting key
        key: String,
    },

    /// Input failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persistence failure
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Shorthand for a `Conflict` error.
    pub fn conflict(entity: &'static str, key: impl ToString) -> Self {
        ServiceError::Conflict {
            entity,
            key: key.to_string(),
        }
    }

    /// Check if this error should be logged at error level.
    ///
    /// Forbidden, NotFound, Conflict and Validation are caller errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ServiceError::Storage(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Forbidden { .. } => 403,
            ServiceError::NotFound { .. } => 404,
            ServiceError::Conflict { .. } => 409,
            ServiceError::Validation(_) => 400,
            ServiceError::Storage(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Forbidden { .. } => "FORBIDDEN",
            ServiceError::NotFound { .. } => "NOT_FOUND",
            ServiceError::Conflict { .. } => "CONFLICT",
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ServiceError::NotFound { entity, key: id },
            StoreError::UniqueViolation { entity, constraint } => ServiceError::Conflict {
                entity,
                key: constraint,
            },
            StoreError::Backend(message) => ServiceError::Storage(message),
        }
    }
}
