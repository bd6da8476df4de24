//! Store error types.

use journey_core::errors::{CoreError, ValidationErrors};
use journey_core::validation::{Rule, Violation};
use thiserror::Error;

/// Errors from insight store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No insight is stored under this id.
    #[error("Insight not found: {0}")]
    NotFound(String),

    /// A save tried to move an existing insight to another user.
    #[error("Insight {id} belongs to {stored}, refusing save for {attempted}")]
    OwnerChanged {
        id: String,
        stored: String,
        attempted: String,
    },

    /// The insight failed validation on write, or stored data failed it on read.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// Reading or appending the log failed.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A thread panicked while holding the index lock.
    #[error("Store index lock poisoned")]
    Poisoned,
}

impl From<StoreError> for CoreError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => Self::NotFound {
                entity_type: "insight".into(),
                id,
            },
            StoreError::OwnerChanged { stored, .. } => {
                Self::Validation(ValidationErrors::new(vec![Violation::new(
                    "user_id",
                    Rule::Immutable,
                    format!("insight is owned by '{stored}'"),
                )]))
            }
            StoreError::Invalid(inner) => inner,
            other => Self::Other(other.into()),
        }
    }
}
