//! Insight kinds, lifecycle statuses, and presentation vocabularies.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids;

// ---------------------------------------------------------------------------
// InsightKind
// ---------------------------------------------------------------------------

/// Discriminant of the [`Insight`](crate::insight::Insight) union. Serialized
/// as the `kind` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    TurningPoint,
    Correlation,
    CascadeMap,
    FuturePrediction,
    ChallengePersistence,
    TherapistSnapshot,
}

impl InsightKind {
    pub const ALL: [Self; 6] = [
        Self::TurningPoint,
        Self::Correlation,
        Self::CascadeMap,
        Self::FuturePrediction,
        Self::ChallengePersistence,
        Self::TherapistSnapshot,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TurningPoint => "turning_point",
            Self::Correlation => "correlation",
            Self::CascadeMap => "cascade_map",
            Self::FuturePrediction => "future_prediction",
            Self::ChallengePersistence => "challenge_persistence",
            Self::TherapistSnapshot => "therapist_snapshot",
        }
    }

    /// Prefix of IDs assigned to insights of this kind.
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::TurningPoint => ids::PREFIX_TURNING_POINT,
            Self::Correlation => ids::PREFIX_CORRELATION,
            Self::CascadeMap => ids::PREFIX_CASCADE_MAP,
            Self::FuturePrediction => ids::PREFIX_FUTURE_PREDICTION,
            Self::ChallengePersistence => ids::PREFIX_CHALLENGE_PERSISTENCE,
            Self::TherapistSnapshot => ids::PREFIX_THERAPIST_SNAPSHOT,
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown insight kind '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// ChallengeStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a recurring challenge.
///
/// ```text
/// active ⇄ inactive
/// active | inactive → resolved → active (relapse)
/// active | inactive → abandoned → active (picked up again)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    Active,
    Inactive,
    Resolved,
    Abandoned,
}

impl ChallengeStatus {
    /// Valid next states from the current state.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Inactive, Self::Resolved, Self::Abandoned],
            Self::Inactive => &[Self::Active, Self::Resolved, Self::Abandoned],
            Self::Resolved => &[Self::Active],
            Self::Abandoned => &[Self::Active],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Resolved => "resolved",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChallengeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Active, Self::Inactive, Self::Resolved, Self::Abandoned]
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown challenge status '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// VisualizationType
// ---------------------------------------------------------------------------

/// How the presentation layer renders a therapist snapshot section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationType {
    EmotionChart,
    Timeline,
    Heatmap,
    ProgressBar,
    Prediction,
}

impl VisualizationType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmotionChart => "emotion_chart",
            Self::Timeline => "timeline",
            Self::Heatmap => "heatmap",
            Self::ProgressBar => "progress_bar",
            Self::Prediction => "prediction",
        }
    }
}

impl fmt::Display for VisualizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Strictness
// ---------------------------------------------------------------------------

/// What construction does with fields no schema declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Reject unknown fields with a violation.
    #[default]
    Strict,
    /// Drop unknown fields and continue.
    Lenient,
}

impl Strictness {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
