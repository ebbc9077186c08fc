//! Schema Error Types

/// Invalid schema descriptor or destination registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("At least one destination must be registered")]
    EmptyRegistry,

    #[error("Duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    #[error("Invalid {field}: {message}")]
    InvalidName {
        field: &'static str,
        message: String,
    },
}

impl crate::core::error_handling::ContextualError for SchemaError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<String> {
        Some(self.to_string())
    }
}

pub type SchemaResult<T> = Result<T, SchemaError>;
