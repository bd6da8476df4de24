use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::InsightBase;
use crate::clock::Clock;
use crate::enums::ChallengeStatus;
use crate::errors::CoreError;
use crate::validation::{PERCENT_RANGE, Rule, Validate, Violations};

/// Achievement earned while working on a challenge.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChallengeBadge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub earned_at: DateTime<Utc>,
    pub challenge_id: String,
    pub challenge_name: String,
    #[schemars(range(max = 4_294_967_295_u32))]
    pub session_count: u32,
}

impl Validate for ChallengeBadge {
    fn check(&self, out: &mut Violations) {
        out.not_blank("id", &self.id);
        out.not_blank("name", &self.name);
        out.not_blank("challenge_id", &self.challenge_id);
    }
}

/// How long a challenge has persisted across sessions, and what it earned.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ChallengePersistence {
    #[serde(flatten)]
    pub base: InsightBase,
    pub challenge_id: String,
    pub challenge_name: String,
    pub first_appearance: DateTime<Utc>,
    #[schemars(range(max = 4_294_967_295_u32))]
    pub persistence_days: u32,
    #[schemars(range(max = 4_294_967_295_u32))]
    pub session_count: u32,
    pub current_status: ChallengeStatus,
    #[serde(default)]
    pub badges_earned: Vec<ChallengeBadge>,
    pub progress_percentage: f64,
}

impl ChallengePersistence {
    /// Move the challenge to `next`, refreshing `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the lifecycle forbids it.
    pub fn transition(&mut self, next: ChallengeStatus, clock: &dyn Clock) -> Result<(), CoreError> {
        if !self.current_status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                entity_type: "challenge_persistence".into(),
                id: self
                    .base
                    .id
                    .clone()
                    .unwrap_or_else(|| self.challenge_id.clone()),
                from: self.current_status.to_string(),
                to: next.to_string(),
            });
        }
        self.current_status = next;
        self.base.touch(clock);
        Ok(())
    }

    /// Attach a badge earned on this challenge, refreshing `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the badge is malformed, belongs to
    /// another challenge, or predates the challenge's first appearance.
    pub fn award_badge(&mut self, badge: ChallengeBadge, clock: &dyn Clock) -> Result<(), CoreError> {
        let mut out = Violations::new();
        out.scoped("badge", |out| self.check_badge(&badge, out));
        out.into_result()?;
        self.badges_earned.push(badge);
        self.base.touch(clock);
        Ok(())
    }

    fn check_badge(&self, badge: &ChallengeBadge, out: &mut Violations) {
        badge.check(out);
        if badge.challenge_id != self.challenge_id {
            out.push(
                "challenge_id",
                Rule::Mismatch,
                format!(
                    "badge belongs to challenge '{}', not '{}'",
                    badge.challenge_id, self.challenge_id
                ),
            );
        }
        if badge.earned_at < self.first_appearance {
            out.push(
                "earned_at",
                Rule::Ordering,
                "must not be earlier than the challenge's first_appearance",
            );
        }
    }
}

impl Validate for ChallengePersistence {
    fn check(&self, out: &mut Violations) {
        self.base.check(out);
        out.not_blank("challenge_id", &self.challenge_id);
        out.not_blank("challenge_name", &self.challenge_name);
        out.in_range(
            "progress_percentage",
            self.progress_percentage,
            PERCENT_RANGE,
        );
        out.scoped("badges_earned", |out| {
            for (i, badge) in self.badges_earned.iter().enumerate() {
                out.scoped(format!("[{i}]"), |out| self.check_badge(badge, out));
            }
        });
    }
}
