//! Cross-cutting error types for Insight Journey.
//!
//! `CoreError` is the taxonomy every layer surfaces to the API boundary:
//! validation failures, missing entities, disallowed lifecycle transitions,
//! and a catch-all for anything unexpected. Crate-specific errors (schema,
//! config, store) are defined in their own crates and convert into it.

use std::fmt;

use thiserror::Error;

use crate::validation::Violation;

/// Errors that can be raised by any Insight Journey crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A lifecycle transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Data failed validation (schema, format, range, references).
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// HTTP status code the API layer answers with for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidTransition { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::Other(_) => 500,
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Violations carried by a validation error, empty for every other kind.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation(errors) => errors.as_slice(),
            _ => &[],
        }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// A non-empty list of violations reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    #[must_use]
    pub const fn new(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }

    /// Whether any violation names `field`.
    #[must_use]
    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Rule;

    #[test]
    fn status_codes_follow_taxonomy() {
        let validation = CoreError::Validation(ValidationErrors::new(vec![]));
        let missing = CoreError::NotFound {
            entity_type: "insight".into(),
            id: "turn-00".into(),
        };
        let other = CoreError::Other(anyhow::anyhow!("boom"));

        assert_eq!(validation.status_code(), 400);
        assert_eq!(missing.status_code(), 404);
        assert_eq!(other.status_code(), 500);
        assert_eq!(other.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn display_joins_violations() {
        let errors = ValidationErrors::new(vec![
            Violation::new("name", Rule::Blank, "must not be blank"),
            Violation::new("user_id", Rule::Required, "is required"),
        ]);
        assert_eq!(
            errors.to_string(),
            "name: must not be blank (blank); user_id: is required (required)"
        );
        assert!(errors.mentions("user_id"));
        assert!(!errors.mentions("description"));
    }
}
