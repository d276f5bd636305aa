//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction and state
/// transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
        }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_field_name() {
        let err = ValidationError::empty_field("profession");
        assert_eq!(err.to_string(), "Field 'profession' cannot be empty");
    }

    #[test]
    fn out_of_range_includes_bounds() {
        let err = ValidationError::out_of_range("confidence", 0, 1, 2);
        assert!(err.to_string().contains("between 0 and 1"));
    }

    #[test]
    fn invalid_format_carries_the_reason() {
        let err = ValidationError::invalid_format("state_transition", "cannot skip stages");
        assert!(err.to_string().contains("cannot skip stages"));
    }
}
