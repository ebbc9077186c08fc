//! Validation utilities for CLI arguments and configuration values

/// A value the user supplied failed validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl crate::core::error_handling::ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<String> {
        Some(self.message.clone())
    }
}

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Validate a record count where `-1` means unbounded
pub fn validate_count(value: &str) -> Result<Option<usize>, String> {
    match value.trim() {
        "-1" => Ok(None),
        other => validate_positive_int(other).map(Some),
    }
}

/// Validate a name that must contain something besides whitespace
pub fn validate_non_empty(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Value cannot be empty".to_string());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error_handling::ContextualError;

    #[test]
    fn test_validate_positive_int() {
        assert_eq!(validate_positive_int("5").unwrap(), 5);
        assert_eq!(validate_positive_int("100").unwrap(), 100);
        assert!(validate_positive_int("0").is_err());
        assert!(validate_positive_int("-5").is_err());
        assert!(validate_positive_int("not_a_number").is_err());
    }

    #[test]
    fn test_validate_count() {
        assert_eq!(validate_count("-1").unwrap(), None);
        assert_eq!(validate_count("25").unwrap(), Some(25));
        assert!(validate_count("0").is_err());
        assert!(validate_count("-2").is_err());
    }

    #[test]
    fn test_validate_non_empty() {
        assert_eq!(validate_non_empty(" primary ").unwrap(), "primary");
        assert!(validate_non_empty("   ").is_err());
    }

    #[test]
    fn test_validation_error_is_user_actionable() {
        let err = ValidationError::new("count must be positive");
        assert!(err.is_user_actionable());
        assert_eq!(err.to_string(), "count must be positive");
    }
}
