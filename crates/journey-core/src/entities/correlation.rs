use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::InsightBase;
use crate::validation::{PERCENT_RANGE, UNIT_RANGE, Validate, Violations};

/// How often a topic shows up in sessions where an emotion is present.
///
/// `correlation_percentage` is on the 0–100 scale; `confidence_score` is a
/// 0–1 fraction.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Correlation {
    #[serde(flatten)]
    pub base: InsightBase,
    pub emotion_name: String,
    pub topic_name: String,
    pub correlation_percentage: f64,
    #[schemars(range(max = 4_294_967_295_u32))]
    pub occurrence_count: u32,
    pub confidence_score: f64,
}

impl Validate for Correlation {
    fn check(&self, out: &mut Violations) {
        self.base.check(out);
        out.not_blank("emotion_name", &self.emotion_name);
        out.not_blank("topic_name", &self.topic_name);
        out.in_range(
            "correlation_percentage",
            self.correlation_percentage,
            PERCENT_RANGE,
        );
        out.in_range("confidence_score", self.confidence_score, UNIT_RANGE);
    }
}
