//! The `InsightStore` trait and the record index both stores share.

use std::collections::HashMap;

use journey_core::errors::{CoreError, ValidationErrors};
use journey_core::ids::generate_id;
use journey_core::insight::Insight;
use journey_schema::InsightCodec;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Persistence seam for insights.
///
/// Records are kept as raw field maps. Every read decodes them through the
/// codec again so data written under an older schema is caught on the way
/// out. Concurrent saves of one id are last-write-wins.
pub trait InsightStore: Send + Sync {
    /// Validate and store `insight`, assigning an id if it has none.
    ///
    /// # Errors
    ///
    /// `StoreError::Invalid` if the insight fails validation,
    /// `StoreError::OwnerChanged` if the id is stored for another user.
    fn save(&self, insight: Insight) -> Result<Insight, StoreError>;

    /// # Errors
    ///
    /// `StoreError::NotFound` if nothing is stored under `id`.
    fn get(&self, id: &str) -> Result<Insight, StoreError>;

    /// All insights owned by `user_id`, most recently updated first.
    ///
    /// # Errors
    ///
    /// `StoreError::Invalid` if a stored record no longer decodes.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Insight>, StoreError>;

    /// # Errors
    ///
    /// `StoreError::NotFound` if nothing is stored under `id`.
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// In-memory index of raw field maps keyed by insight id.
#[derive(Debug, Default)]
pub(crate) struct Records {
    by_id: HashMap<String, Map<String, Value>>,
}

impl Records {
    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    pub(crate) fn insert(&mut self, id: String, fields: Map<String, Value>) {
        self.by_id.insert(id, fields);
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Map<String, Value>> {
        self.by_id.remove(id)
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Validate `insight`, assign an id, and check ownership against what
    /// is already stored. Returns the id and the encoded field map.
    pub(crate) fn prepare(
        &self,
        codec: &InsightCodec,
        mut insight: Insight,
    ) -> Result<(Insight, String, Map<String, Value>), StoreError> {
        let violations = codec.validate(&insight);
        if !violations.is_empty() {
            return Err(CoreError::Validation(ValidationErrors::new(violations)).into());
        }

        let id = match insight.id() {
            Some(id) => id.to_string(),
            None => {
                let id = generate_id(insight.kind().id_prefix())?;
                insight.assign_id(id.clone());
                id
            }
        };

        if let Some(stored) = self.by_id.get(&id) {
            let owner = stored.get("user_id").and_then(Value::as_str).unwrap_or_default();
            if owner != insight.user_id() {
                return Err(StoreError::OwnerChanged {
                    id,
                    stored: owner.to_string(),
                    attempted: insight.user_id().to_string(),
                });
            }
        }

        let fields = codec.to_fields(&insight)?;
        Ok((insight, id, fields))
    }

    pub(crate) fn get(&self, codec: &InsightCodec, id: &str) -> Result<Insight, StoreError> {
        let fields = self
            .by_id
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(codec.from_value(Value::Object(fields.clone()))?)
    }

    pub(crate) fn list_for_user(
        &self,
        codec: &InsightCodec,
        user_id: &str,
    ) -> Result<Vec<Insight>, StoreError> {
        let mut insights = self
            .by_id
            .values()
            .filter(|fields| fields.get("user_id").and_then(Value::as_str) == Some(user_id))
            .map(|fields| codec.from_value(Value::Object(fields.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        insights.sort_by(|a, b| {
            b.base()
                .updated_at
                .cmp(&a.base().updated_at)
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(insights)
    }
}
