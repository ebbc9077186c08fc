//! Store Error Types

/// Errors reported by a [`KeyValueStore`](crate::store::KeyValueStore) backend
///
/// The variants mirror the failure classes a conditional-write key-value
/// store exposes. Callers decide on retry policy; use [`StoreError::is_transient`]
/// to tell "try again" apart from everything else.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("The conditional request failed")]
    ConditionalCheckFailed,

    #[error("Request throttled: {message}")]
    Throttled { message: String },

    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Requested resource not found: {resource}")]
    ResourceNotFound { resource: String },

    #[error("Resource in use: {resource}")]
    ResourceInUse { resource: String },

    #[error("Invalid request: {message}")]
    Validation { message: String },

    #[error("Storage IO failed: {message}")]
    Io { message: String },

    #[error("Snapshot serialization failed: {message}")]
    Serialization { message: String },
}

impl StoreError {
    /// True for failures that may succeed when repeated unchanged
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Throttled { .. } | StoreError::Unavailable { .. }
        )
    }

    pub fn is_conditional_check_failed(&self) -> bool {
        matches!(self, StoreError::ConditionalCheckFailed)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
