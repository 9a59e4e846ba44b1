//! Error types for model definition and validation

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Model definition and validation errors
#[derive(Error, Debug)]
pub enum ModelError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("Invalid rule for field \"{field}\": {message}")]
    InvalidRule { field: String, message: String },

    #[error("Invalid combined schema: {0}")]
    InvalidSchema(String),

    #[error("A model schema must declare at least one field")]
    EmptySchema,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Whether this error reports data that failed validation, as opposed
    /// to a defect in the schema definition itself.
    pub fn is_validation(&self) -> bool {
        matches!(self, ModelError::Validation(_))
    }

    /// The individual violations behind a validation failure, if any.
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            ModelError::Validation(failure) => Some(&failure.violations),
            _ => None,
        }
    }
}

/// One violated rule, as reported by the validation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Field the violation points at, when one can be named.
    pub field: Option<String>,
    /// Human-readable description, e.g. `"name" is required`.
    pub message: String,
}

/// Data failed to satisfy the active schema.
///
/// Carries every violated rule (or only the first, under `abort_early`);
/// the display message enumerates them all.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub(crate) fn single(field: Option<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation {
                field,
                message: message.into(),
            }],
        }
    }

    /// Names of the fields with violations, in reported order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().filter_map(|v| v.field.as_deref())
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_marker() {
        let err: ModelError = ValidationFailure::single(Some("name".into()), "\"name\" is required").into();
        assert!(err.is_validation());

        let err = ModelError::EmptySchema;
        assert!(!err.is_validation());
    }

    #[test]
    fn test_message_enumerates_violations() {
        let failure = ValidationFailure::new(vec![
            Violation {
                field: Some("name".into()),
                message: "\"name\" is required".into(),
            },
            Violation {
                field: Some("age".into()),
                message: "\"age\" is required".into(),
            },
        ]);
        let message = failure.to_string();
        assert!(message.contains("\"name\" is required"));
        assert!(message.contains("\"age\" is required"));
    }

    #[test]
    fn test_violations_accessor() {
        let err: ModelError = ValidationFailure::single(Some("age".into()), "bad").into();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field.as_deref(), Some("age"));
    }
}
