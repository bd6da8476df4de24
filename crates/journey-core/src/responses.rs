//! JSON bodies returned by the insight API endpoints.
//!
//! These structs define the response shape of `GET /insights/correlations`,
//! `GET /insights/challenge-persistence`, `GET /insights/all`, the
//! reflection endpoint, and the error envelope every endpoint shares.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{CascadeMap, ChallengePersistence, Correlation, FuturePrediction, TurningPoint};
use crate::errors::CoreError;
use crate::validation::Violation;

/// How many correlations and challenges the aggregate view carries.
pub const ALL_INSIGHTS_LIMIT: usize = 3;

/// Response from `GET /insights/correlations`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CorrelationsResponse {
    pub correlations: Vec<Correlation>,
}

/// Response from `GET /insights/challenge-persistence`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ChallengesResponse {
    pub challenges: Vec<ChallengePersistence>,
}

/// Response from `GET /insights/all`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AllInsightsResponse {
    pub turning_point: Option<TurningPoint>,
    pub correlations: Vec<Correlation>,
    pub cascade_map: Option<CascadeMap>,
    pub future_prediction: Option<FuturePrediction>,
    pub challenges: Vec<ChallengePersistence>,
}

impl AllInsightsResponse {
    /// Assemble the aggregate view, keeping the first
    /// [`ALL_INSIGHTS_LIMIT`] correlations and challenges.
    #[must_use]
    pub fn new(
        turning_point: Option<TurningPoint>,
        mut correlations: Vec<Correlation>,
        cascade_map: Option<CascadeMap>,
        future_prediction: Option<FuturePrediction>,
        mut challenges: Vec<ChallengePersistence>,
    ) -> Self {
        correlations.truncate(ALL_INSIGHTS_LIMIT);
        challenges.truncate(ALL_INSIGHTS_LIMIT);
        Self {
            turning_point,
            correlations,
            cascade_map,
            future_prediction,
            challenges,
        }
    }
}

/// Body of `POST /insights/therapist-snapshot/reflection`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReflectionRequest {
    pub reflection: String,
}

/// Response from `POST /insights/therapist-snapshot/reflection`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReflectionResponse {
    pub status: String,
    pub message: String,
}

impl ReflectionResponse {
    #[must_use]
    pub fn added() -> Self {
        Self {
            status: "success".into(),
            message: "Reflection added to therapist snapshot".into(),
        }
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    pub error_code: String,
    pub violations: Vec<Violation>,
}

impl ErrorResponse {
    /// Map an error to its response body.
    ///
    /// Unexpected errors are logged with full context and answered with an
    /// opaque message.
    #[must_use]
    pub fn from_error(error: &CoreError) -> Self {
        let status_code = error.status_code();
        let (title, message) = match error {
            CoreError::Validation(_) | CoreError::InvalidTransition { .. } => {
                ("Bad Request", error.to_string())
            }
            CoreError::NotFound { .. } => ("Not Found", error.to_string()),
            CoreError::Other(inner) => {
                tracing::error!("Internal Server Error: {inner:#}");
                (
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };
        Self {
            error: title.to_string(),
            message,
            status_code,
            error_code: error.error_code().to_string(),
            violations: error.violations().to_vec(),
        }
    }
}

impl From<&CoreError> for ErrorResponse {
    fn from(error: &CoreError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationErrors;
    use crate::validation::Rule;

    #[test]
    fn validation_error_carries_violations() {
        let error = CoreError::Validation(ValidationErrors::new(vec![Violation::new(
            "correlation_percentage",
            Rule::OutOfRange,
            "must be between 0 and 100, got 150",
        )]));
        let body = ErrorResponse::from_error(&error);
        assert_eq!(body.status_code, 400);
        assert_eq!(body.error_code, "VALIDATION_ERROR");
        assert_eq!(body.violations.len(), 1);
        assert_eq!(body.violations[0].field, "correlation_percentage");
    }

    #[test]
    fn unexpected_error_is_opaque() {
        let error = CoreError::Other(anyhow::anyhow!("connection refused to graph://10.0.0.3"));
        let body = ErrorResponse::from_error(&error);
        assert_eq!(body.status_code, 500);
        assert!(!body.message.contains("10.0.0.3"));
        assert!(body.violations.is_empty());
    }

    #[test]
    fn not_found_maps_to_404() {
        let error = CoreError::NotFound {
            entity_type: "insight".into(),
            id: "casc-0011223344556677".into(),
        };
        let body = ErrorResponse::from(&error);
        assert_eq!(body.status_code, 404);
        assert_eq!(body.error, "Not Found");
    }

    #[test]
    fn all_insights_serializes_missing_as_null() {
        let response = AllInsightsResponse::new(None, Vec::new(), None, None, Vec::new());
        assert!(response.correlations.is_empty());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["turning_point"].is_null());
        assert!(json["cascade_map"].is_null());
    }
}
