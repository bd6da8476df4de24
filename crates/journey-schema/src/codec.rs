//! Construction, serialization, and deserialization of insights.
//!
//! [`InsightCodec`] is the single entry point for turning loose field maps
//! or JSON text into typed [`Insight`] values. Every path runs the same
//! pipeline:
//!
//! 1. drop the `kind` tag (it must agree with the requested kind)
//! 2. handle undeclared fields according to [`Strictness`]
//! 3. fill missing `created_at` / `updated_at` from the clock
//! 4. check the result against the variant's JSON Schema
//! 5. decode into the typed struct
//! 6. run the variant's [`Validate`] rules
//!
//! Failures in steps 1-4 are collected together; the caller sees every
//! offending field at once.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use journey_core::clock::{Clock, SystemClock};
use journey_core::entities::ChallengeBadge;
use journey_core::enums::{InsightKind, Strictness};
use journey_core::errors::{CoreError, ValidationErrors};
use journey_core::insight::Insight;
use journey_core::validation::{Rule, Validate, Violation};
use jsonschema::Validator;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::fields::{self, ROOT_FIELD};
use crate::registry::SchemaRegistry;

const BADGE_SCHEMA: &str = "challenge_badge";
const TIMESTAMP_FIELDS: [&str; 2] = ["created_at", "updated_at"];

/// Builds, encodes, and decodes insights against the registered schemas.
pub struct InsightCodec {
    registry: SchemaRegistry,
    validators: HashMap<&'static str, Validator>,
    strictness: Strictness,
    clock: Arc<dyn Clock>,
}

impl InsightCodec {
    /// Codec using wall-clock time for default timestamps.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Generation` if a variant schema fails to compile.
    pub fn new(strictness: Strictness) -> Result<Self, SchemaError> {
        Self::with_clock(strictness, Arc::new(SystemClock))
    }

    /// Codec with an injected clock.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Generation` if a variant schema fails to compile.
    pub fn with_clock(strictness: Strictness, clock: Arc<dyn Clock>) -> Result<Self, SchemaError> {
        let registry = SchemaRegistry::new();
        let mut validators = HashMap::new();
        for name in InsightKind::ALL
            .into_iter()
            .map(InsightKind::as_str)
            .chain([BADGE_SCHEMA])
        {
            validators.insert(name, registry.validator(name)?);
        }
        tracing::debug!(?strictness, schemas = validators.len(), "insight codec ready");
        Ok(Self {
            registry,
            validators,
            strictness,
            clock,
        })
    }

    #[must_use]
    pub const fn strictness(&self) -> Strictness {
        self.strictness
    }

    #[must_use]
    pub const fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Current time according to the codec's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Build a validated insight of `kind` from a field map.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` listing every offending field.
    pub fn construct(&self, kind: InsightKind, mut fields: Map<String, Value>) -> Result<Insight, CoreError> {
        let mut violations = Vec::new();
        if let Some(tag) = fields.remove("kind") {
            if tag.as_str() != Some(kind.as_str()) {
                violations.push(Violation::new(
                    "kind",
                    Rule::Mismatch,
                    format!("expected '{kind}', got {tag}"),
                ));
            }
        }
        self.fill_timestamps(&mut fields);

        let schema = kind.as_str();
        match kind {
            InsightKind::TurningPoint => self
                .decode(schema, fields, violations)
                .map(Insight::TurningPoint),
            InsightKind::Correlation => self
                .decode(schema, fields, violations)
                .map(Insight::Correlation),
            InsightKind::CascadeMap => self
                .decode(schema, fields, violations)
                .map(Insight::CascadeMap),
            InsightKind::FuturePrediction => self
                .decode(schema, fields, violations)
                .map(Insight::FuturePrediction),
            InsightKind::ChallengePersistence => self
                .decode(schema, fields, violations)
                .map(Insight::ChallengePersistence),
            InsightKind::TherapistSnapshot => self
                .decode(schema, fields, violations)
                .map(Insight::TherapistSnapshot),
        }
    }

    /// Build a validated badge from a field map. Badges carry no default
    /// timestamps: `earned_at` is required.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` listing every offending field.
    pub fn construct_badge(&self, fields: Map<String, Value>) -> Result<ChallengeBadge, CoreError> {
        self.decode(BADGE_SCHEMA, fields, Vec::new())
    }

    /// Encode an insight as JSON text, `kind` tag first.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if serialization fails.
    pub fn serialize(&self, insight: &Insight) -> Result<String, CoreError> {
        serde_json::to_string(insight).map_err(|e| CoreError::Other(e.into()))
    }

    /// Encode an insight as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if serialization fails.
    pub fn to_value(&self, insight: &Insight) -> Result<Value, CoreError> {
        serde_json::to_value(insight).map_err(|e| CoreError::Other(e.into()))
    }

    /// Encode an insight as a flat field map including the `kind` tag.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if serialization fails or does not yield
    /// an object.
    pub fn to_fields(&self, insight: &Insight) -> Result<Map<String, Value>, CoreError> {
        match self.to_value(insight)? {
            Value::Object(map) => Ok(map),
            other => Err(CoreError::Other(anyhow::anyhow!(
                "insight serialized to {other} instead of an object"
            ))),
        }
    }

    /// Decode JSON text produced by [`serialize`](Self::serialize).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the text is not JSON or does not
    /// describe a valid insight.
    pub fn deserialize(&self, repr: &str) -> Result<Insight, CoreError> {
        let value: Value = serde_json::from_str(repr).map_err(|e| {
            invalid(vec![Violation::new(
                ROOT_FIELD,
                Rule::InvalidType,
                format!("not valid JSON: {e}"),
            )])
        })?;
        self.from_value(value)
    }

    /// Decode a tagged JSON value, reading the variant from `kind`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the tag is missing or unknown, or
    /// the fields do not describe a valid insight.
    pub fn from_value(&self, value: Value) -> Result<Insight, CoreError> {
        let Value::Object(fields) = value else {
            return Err(invalid(vec![Violation::new(
                ROOT_FIELD,
                Rule::InvalidType,
                "expected a JSON object",
            )]));
        };
        let kind = match fields.get("kind") {
            None | Some(Value::Null) => {
                return Err(invalid(vec![Violation::new("kind", Rule::Required, "is required")]));
            }
            Some(Value::String(tag)) => tag
                .parse::<InsightKind>()
                .map_err(|e| invalid(vec![Violation::new("kind", Rule::InvalidType, e)]))?,
            Some(other) => {
                return Err(invalid(vec![Violation::new(
                    "kind",
                    Rule::InvalidType,
                    format!("expected a string, got {other}"),
                )]));
            }
        };
        self.construct(kind, fields)
    }

    /// Every violation of the insight's rules. Empty means valid.
    #[must_use]
    pub fn validate(&self, insight: &Insight) -> Vec<Violation> {
        insight.violations()
    }

    fn fill_timestamps(&self, fields: &mut Map<String, Value>) {
        let mut now = None;
        for field in TIMESTAMP_FIELDS {
            if fields.get(field).is_none_or(Value::is_null) {
                let stamp = now.get_or_insert_with(|| {
                    self.clock.now().to_rfc3339_opts(SecondsFormat::AutoSi, true)
                });
                fields.insert(field.to_string(), Value::String(stamp.clone()));
            }
        }
    }

    fn decode<T>(
        &self,
        schema_name: &'static str,
        fields: Map<String, Value>,
        mut violations: Vec<Violation>,
    ) -> Result<T, CoreError>
    where
        T: DeserializeOwned + Validate,
    {
        let schema = self
            .registry
            .get(schema_name)
            .ok_or_else(|| SchemaError::NotFound(schema_name.to_string()))?;
        let validator = self
            .validators
            .get(schema_name)
            .ok_or_else(|| SchemaError::NotFound(schema_name.to_string()))?;

        let mut value = Value::Object(fields);
        let unknown = fields::prune_unknown(schema, &mut value);
        if !unknown.is_empty() {
            match self.strictness {
                Strictness::Strict => violations.extend(
                    unknown
                        .into_iter()
                        .map(|field| Violation::new(field, Rule::UnknownField, "is not a known field")),
                ),
                Strictness::Lenient => {
                    tracing::debug!(schema = schema_name, fields = ?unknown, "dropping unknown fields");
                }
            }
        }

        violations.extend(validator.iter_errors(&value).map(|e| fields::to_violation(&e)));
        if !violations.is_empty() {
            return Err(invalid(violations));
        }

        let typed: T = serde_json::from_value(value).map_err(|e| {
            invalid(vec![Violation::new(ROOT_FIELD, Rule::InvalidType, e.to_string())])
        })?;
        typed.validate()?;
        Ok(typed)
    }
}

fn invalid(violations: Vec<Violation>) -> CoreError {
    CoreError::Validation(ValidationErrors::new(violations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use journey_core::clock::FixedClock;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn codec(strictness: Strictness) -> InsightCodec {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        InsightCodec::with_clock(strictness, Arc::new(clock)).unwrap()
    }

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn missing_timestamps_come_from_clock() {
        let stamp = "2024-03-01T12:00:00Z";
        let mut map = fields(json!({"created_at": null}));
        codec(Strictness::Strict).fill_timestamps(&mut map);
        assert_eq!(map["created_at"], stamp);
        assert_eq!(map["updated_at"], stamp);
    }

    #[test]
    fn provided_timestamps_are_kept() {
        let mut map = fields(json!({"created_at": "2024-01-01T00:00:00Z"}));
        codec(Strictness::Strict).fill_timestamps(&mut map);
        assert_eq!(map["created_at"], "2024-01-01T00:00:00Z");
        assert_eq!(map["updated_at"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn from_value_requires_kind() {
        let err = codec(Strictness::Strict)
            .from_value(json!({"user_id": "u1"}))
            .unwrap_err();
        assert_eq!(err.violations()[0].field, "kind");
        assert_eq!(err.violations()[0].rule, Rule::Required);
    }

    #[test]
    fn from_value_rejects_unknown_kind() {
        let err = codec(Strictness::Strict)
            .from_value(json!({"kind": "horoscope"}))
            .unwrap_err();
        assert_eq!(err.violations()[0].rule, Rule::InvalidType);
    }

    #[test]
    fn deserialize_rejects_non_json() {
        let err = codec(Strictness::Lenient).deserialize("{not json").unwrap_err();
        assert_eq!(err.violations()[0].field, ROOT_FIELD);
    }
}
