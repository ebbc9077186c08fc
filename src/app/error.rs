//! Application Error Types

use crate::app::cli::ConfigError;
use crate::core::error_handling::ContextualError;
use crate::core::validation::ValidationError;
use crate::queue::QueueError;
use crate::schema::SchemaError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("Failed to open store: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to initialise logging: {message}")]
    Logging { message: String },
}

impl AppError {
    /// Interrupted by a signal or a deadline rather than failed
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Queue(err) if err.is_cancellation())
    }
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            Self::Config(err) => err.is_user_actionable(),
            Self::Schema(err) => err.is_user_actionable(),
            Self::Queue(err) => err.is_user_actionable(),
            Self::Validation(err) => err.is_user_actionable(),
            Self::Logging { .. } => true,
            Self::Store(_) | Self::Io(_) => false,
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            Self::Config(err) => err.user_message(),
            Self::Schema(err) => err.user_message(),
            Self::Queue(err) => err.user_message(),
            Self::Validation(err) => err.user_message(),
            Self::Logging { .. } => Some(self.to_string()),
            Self::Store(_) | Self::Io(_) => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
