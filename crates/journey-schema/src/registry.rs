//! Central schema registry for all Insight Journey types.
//!
//! The `SchemaRegistry` builds JSON Schemas from journey-core types at
//! construction time using [`schemars::schema_for!`] and provides validation
//! via `jsonschema`.

use std::collections::HashMap;

use journey_core::enums::InsightKind;
use journey_core::validation::Violation;
use jsonschema::Validator;
use schemars::schema_for;

use crate::error::SchemaError;
use crate::fields;

/// Central store of all JSON Schemas in the Insight Journey model.
///
/// Built from journey-core types via [`schemars::schema_for!`]. Provides
/// lookup by name and validation of arbitrary JSON values against registered
/// schemas. Insight variants are registered under their [`InsightKind`] tag.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value`. Panics if `serde_json::to_value` fails (should be
/// infallible for valid `schemars` output).
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap());
    };
}

impl SchemaRegistry {
    /// Build a new registry containing all insight, nested record, and
    /// response schemas from journey-core.
    ///
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on any `schemars`-generated
    /// schema. This is not expected in practice because `schemars` always
    /// produces valid JSON-serialisable output.
    #[must_use]
    pub fn new() -> Self {
        use journey_core::{entities, insight, responses};

        let mut schemas = HashMap::new();

        // --- Insight variants (6) ---
        register!(schemas, InsightKind::TurningPoint.as_str(), entities::TurningPoint);
        register!(schemas, InsightKind::Correlation.as_str(), entities::Correlation);
        register!(schemas, InsightKind::CascadeMap.as_str(), entities::CascadeMap);
        register!(
            schemas,
            InsightKind::FuturePrediction.as_str(),
            entities::FuturePrediction
        );
        register!(
            schemas,
            InsightKind::ChallengePersistence.as_str(),
            entities::ChallengePersistence
        );
        register!(
            schemas,
            InsightKind::TherapistSnapshot.as_str(),
            entities::TherapistSnapshot
        );

        // --- Tagged union (1) ---
        register!(schemas, "insight", insight::Insight);

        // --- Nested records (5) ---
        register!(schemas, "challenge_badge", entities::ChallengeBadge);
        register!(schemas, "cascade_node", entities::CascadeNode);
        register!(schemas, "cascade_edge", entities::CascadeEdge);
        register!(schemas, "topic_prediction", entities::TopicPrediction);
        register!(schemas, "snapshot_section", entities::SnapshotSection);

        // --- API bodies (6) ---
        register!(
            schemas,
            "correlations_response",
            responses::CorrelationsResponse
        );
        register!(schemas, "challenges_response", responses::ChallengesResponse);
        register!(
            schemas,
            "all_insights_response",
            responses::AllInsightsResponse
        );
        register!(schemas, "reflection_request", responses::ReflectionRequest);
        register!(schemas, "reflection_response", responses::ReflectionResponse);
        register!(schemas, "error_response", responses::ErrorResponse);

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Schema for one insight variant (without the `kind` tag).
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the variant was never registered.
    pub fn for_kind(&self, kind: InsightKind) -> Result<&serde_json::Value, SchemaError> {
        self.get(kind.as_str())
            .ok_or_else(|| SchemaError::NotFound(kind.to_string()))
    }

    /// Compile a named schema with `date-time` format checking enabled.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::Generation` if the schema fails to compile.
    pub fn validator(&self, name: &str) -> Result<Validator, SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        jsonschema::options()
            .should_validate_formats(true)
            .build(schema)
            .map_err(|e| SchemaError::Generation(format!("{name}: {e}")))
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let validator = self.validator(name)?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// Validate a JSON value against a named schema, reporting each failure
    /// as a [`Violation`] naming the offending field.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` or `SchemaError::Generation` when the
    /// schema itself is unusable. Validation failures are in the `Ok` value.
    pub fn check(
        &self,
        name: &str,
        instance: &serde_json::Value,
    ) -> Result<Vec<Violation>, SchemaError> {
        let validator = self.validator(name)?;
        Ok(validator
            .iter_errors(instance)
            .map(|e| fields::to_violation(&e))
            .collect())
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
