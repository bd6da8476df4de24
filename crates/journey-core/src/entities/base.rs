use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::validation::{Rule, Validate, Violations};

/// Fields shared by every insight variant.
///
/// `id` stays `None` until the persistence layer assigns one. `user_id` is
/// fixed at creation; stores reject saves that change it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InsightBase {
    pub id: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub description: String,
}

impl InsightBase {
    /// New unsaved base with both timestamps set to `clock.now()`.
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        Self {
            id: None,
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Refresh `updated_at`. Every mutator calls this.
    pub fn touch(&mut self, clock: &dyn Clock) {
        self.updated_at = clock.now();
    }
}

impl Validate for InsightBase {
    fn check(&self, out: &mut Violations) {
        if let Some(id) = &self.id {
            out.not_blank("id", id);
        }
        out.not_blank("user_id", &self.user_id);
        out.not_blank("name", &self.name);
        if self.updated_at < self.created_at {
            out.push(
                "updated_at",
                Rule::Ordering,
                "must not be earlier than created_at",
            );
        }
    }
}
