//! Queue Error Types

use crate::core::context::Interruption;
use crate::queue::ack::AckReport;
use crate::store::StoreError;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Invalid request: {message}")]
    Validation { message: String },

    #[error("Unknown destination: {name}")]
    UnknownDestination { name: String },

    #[error("Record '{id}' is malformed: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Store {operation} failed: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{operation} cancelled")]
    Cancelled { operation: &'static str },

    #[error("{operation} timed out after {timeout:?}")]
    TimedOut {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Acknowledgment stopped after {} of {total} records: {cause}", partial.len())]
    AckInterrupted {
        partial: AckReport,
        total: usize,
        cause: Box<QueueError>,
    },
}

impl QueueError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn interrupted(operation: &'static str, interruption: Interruption) -> Self {
        match interruption {
            Interruption::Cancelled => Self::Cancelled { operation },
            Interruption::TimedOut(timeout) => Self::TimedOut { operation, timeout },
        }
    }

    /// Store error underneath this error, if any
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Store { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Throttling or unavailability; safe for the caller to retry
    pub fn is_transient(&self) -> bool {
        self.store_error().is_some_and(StoreError::is_transient)
    }

    /// Cancelled, timed out, or an acknowledgment interrupted by either
    pub fn is_cancellation(&self) -> bool {
        match self {
            Self::Cancelled { .. } | Self::TimedOut { .. } => true,
            Self::AckInterrupted { cause, .. } => cause.is_cancellation(),
            _ => false,
        }
    }
}

impl crate::core::error_handling::ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::UnknownDestination { .. }
                | Self::Cancelled { .. }
                | Self::TimedOut { .. }
                | Self::AckInterrupted { .. }
        ) || matches!(
            self.store_error(),
            Some(StoreError::ResourceNotFound { .. })
        )
    }

    fn user_message(&self) -> Option<String> {
        match self {
            Self::Store {
                source: StoreError::ResourceNotFound { resource },
                ..
            } => Some(format!(
                "{} does not exist; run `sprinkler init` first",
                resource
            )),
            _ if self.is_user_actionable() => Some(self.to_string()),
            _ => None,
        }
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
