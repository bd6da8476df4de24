use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::InsightBase;
use crate::validation::{Validate, Violations};

/// The moment an emotion's intensity changed significantly between two
/// consecutive sessions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TurningPoint {
    #[serde(flatten)]
    pub base: InsightBase,
    pub turning_date: DateTime<Utc>,
    pub emotion_name: String,
    pub previous_intensity: f64,
    pub current_intensity: f64,
    /// Insight recorded in the session where the change happened.
    pub insight_id: Option<String>,
    pub insight_name: Option<String>,
    pub sessions_before: Option<Vec<String>>,
    pub sessions_after: Option<Vec<String>>,
}

impl TurningPoint {
    /// Signed change in intensity; negative means the emotion eased.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.current_intensity - self.previous_intensity
    }

    /// Whether `turning_date` lies inside the inclusive session window the
    /// point was derived from. The window is not part of the model, so
    /// producers check it here before handing the value over.
    #[must_use]
    pub fn falls_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start <= self.turning_date && self.turning_date <= end
    }
}

impl Validate for TurningPoint {
    fn check(&self, out: &mut Violations) {
        self.base.check(out);
        out.not_blank("emotion_name", &self.emotion_name);
        out.finite("previous_intensity", self.previous_intensity);
        out.finite("current_intensity", self.current_intensity);
        if let Some(id) = &self.insight_id {
            out.not_blank("insight_id", id);
        }
        for (field, sessions) in [
            ("sessions_before", &self.sessions_before),
            ("sessions_after", &self.sessions_after),
        ] {
            let Some(sessions) = sessions else { continue };
            out.scoped(field, |out| {
                for (i, session_id) in sessions.iter().enumerate() {
                    out.not_blank(&format!("[{i}]"), session_id);
                }
            });
        }
    }
}
