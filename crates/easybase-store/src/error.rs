//! Error types for repository operations.

use thiserror::Error;

/// Repository error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No row with the given id exists.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// A write would violate a unique constraint.
    #[error("Unique constraint {constraint} violated for {entity}")]
    UniqueViolation {
        /// Entity name.
        entity: &'static str,
        /// Name of the violated constraint.
        constraint: String,
    },

    /// The backing store failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for repository operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Check whether this error is a unique constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }
}
