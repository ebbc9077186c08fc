//! Generic error handling utilities
//!
//! Provides unified error handling that can work across the error types of
//! the store, schema, queue and command layers.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)` with a helpful, actionable message. When it returns `false`,
/// `user_message()` should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on
    ///
    /// Examples of user-actionable errors:
    /// - Argument parsing failures
    /// - Unknown destination names
    /// - Configuration errors with clear fixes
    ///
    /// Examples of system errors:
    /// - IO failures
    /// - Store throttling or unavailability
    fn is_user_actionable(&self) -> bool;

    /// The specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<String>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors print their own message; system errors print the
/// operation context and leave the detail to debug level.
///
/// # Examples
/// ```rust,no_run
/// # use sprinkler::core::error_handling::log_error_with_context;
/// # use sprinkler::core::validation::ValidationError;
/// let err = ValidationError::new("count must be positive");
/// log_error_with_context(&err, "Reading records");
/// // Logs: "FATAL: count must be positive"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
