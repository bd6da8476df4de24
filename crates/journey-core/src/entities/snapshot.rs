use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::InsightBase;
use crate::clock::Clock;
use crate::enums::VisualizationType;
use crate::errors::CoreError;
use crate::validation::{Rule, Validate, Violations};

/// One titled block of a therapist snapshot. `data` is rendered by the
/// presentation layer according to `visualization_type`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SnapshotSection {
    pub title: String,
    pub data: serde_json::Map<String, serde_json::Value>,
    pub visualization_type: VisualizationType,
}

impl SnapshotSection {
    pub fn new(title: impl Into<String>, visualization_type: VisualizationType) -> Self {
        Self {
            title: title.into(),
            data: serde_json::Map::new(),
            visualization_type,
        }
    }
}

impl Validate for SnapshotSection {
    fn check(&self, out: &mut Violations) {
        out.not_blank("title", &self.title);
    }
}

/// Clinician-facing summary of progress over a run of sessions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TherapistSnapshot {
    #[serde(flatten)]
    pub base: InsightBase,
    pub progress_overview: SnapshotSection,
    pub breakthrough_timeline: SnapshotSection,
    pub belief_shifts: SnapshotSection,
    pub action_item_adherence: SnapshotSection,
    pub next_session_forecast: Option<SnapshotSection>,
    pub client_reflection: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[schemars(range(max = 4_294_967_295_u32))]
    pub session_count: u32,
}

impl TherapistSnapshot {
    /// Record the client's own reflection, refreshing `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `reflection` is blank.
    pub fn set_client_reflection(
        &mut self,
        reflection: impl Into<String>,
        clock: &dyn Clock,
    ) -> Result<(), CoreError> {
        let reflection = reflection.into();
        let mut out = Violations::new();
        out.not_blank("client_reflection", &reflection);
        out.into_result()?;
        self.client_reflection = Some(reflection);
        self.base.touch(clock);
        Ok(())
    }

    /// The four required sections followed by the forecast, if any.
    pub fn sections(&self) -> impl Iterator<Item = (&'static str, &SnapshotSection)> {
        [
            ("progress_overview", Some(&self.progress_overview)),
            ("breakthrough_timeline", Some(&self.breakthrough_timeline)),
            ("belief_shifts", Some(&self.belief_shifts)),
            ("action_item_adherence", Some(&self.action_item_adherence)),
            ("next_session_forecast", self.next_session_forecast.as_ref()),
        ]
        .into_iter()
        .filter_map(|(field, section)| section.map(|s| (field, s)))
    }
}

impl Validate for TherapistSnapshot {
    fn check(&self, out: &mut Violations) {
        self.base.check(out);
        for (field, section) in self.sections() {
            out.scoped(field, |out| section.check(out));
        }
        if let Some(reflection) = &self.client_reflection {
            out.not_blank("client_reflection", reflection);
        }
        if self.start_date > self.end_date {
            out.push("end_date", Rule::Ordering, "must not be earlier than start_date");
        }
    }
}
