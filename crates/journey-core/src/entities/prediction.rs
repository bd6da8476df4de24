use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::InsightBase;
use crate::validation::{UNIT_RANGE, Validate, Violations};

/// An emotion expected to accompany a predicted topic, with its weight.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RelatedEmotion {
    pub emotion: String,
    pub weight: f64,
}

/// One topic likely to come up in an upcoming session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TopicPrediction {
    pub topic_name: String,
    pub probability: f64,
    #[serde(default)]
    pub related_emotions: Vec<RelatedEmotion>,
}

/// Topics predicted for upcoming sessions.
///
/// Each prediction is independent, so probabilities need not sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FuturePrediction {
    #[serde(flatten)]
    pub base: InsightBase,
    pub predictions: Vec<TopicPrediction>,
    pub confidence_score: f64,
    pub based_on_sessions: Vec<String>,
}

impl FuturePrediction {
    /// Predictions ordered from most to least likely.
    #[must_use]
    pub fn ranked(&self) -> Vec<&TopicPrediction> {
        let mut ranked: Vec<&TopicPrediction> = self.predictions.iter().collect();
        ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        ranked
    }
}

impl Validate for FuturePrediction {
    fn check(&self, out: &mut Violations) {
        self.base.check(out);
        out.scoped("predictions", |out| {
            for (i, prediction) in self.predictions.iter().enumerate() {
                out.scoped(format!("[{i}]"), |out| {
                    out.not_blank("topic_name", &prediction.topic_name);
                    out.in_range("probability", prediction.probability, UNIT_RANGE);
                    out.scoped("related_emotions", |out| {
                        for (j, related) in prediction.related_emotions.iter().enumerate() {
                            out.scoped(format!("[{j}]"), |out| {
                                out.not_blank("emotion", &related.emotion);
                                out.finite("weight", related.weight);
                            });
                        }
                    });
                });
            }
        });
        out.in_range("confidence_score", self.confidence_score, UNIT_RANGE);
        out.scoped("based_on_sessions", |out| {
            for (i, session_id) in self.based_on_sessions.iter().enumerate() {
                out.not_blank(&format!("[{i}]"), session_id);
            }
        });
    }
}
