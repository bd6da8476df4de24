//! The `Insight` tagged union.
//!
//! Serialized with a leading `kind` tag followed by the variant's flat field
//! set, e.g. `{"kind":"correlation","id":null,"user_id":"u1",...}`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::entities::{
    CascadeMap, ChallengePersistence, Correlation, FuturePrediction, InsightBase,
    TherapistSnapshot, TurningPoint,
};
use crate::enums::InsightKind;
use crate::validation::{Validate, Violations};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    TurningPoint(TurningPoint),
    Correlation(Correlation),
    CascadeMap(CascadeMap),
    FuturePrediction(FuturePrediction),
    ChallengePersistence(ChallengePersistence),
    TherapistSnapshot(TherapistSnapshot),
}

impl Insight {
    #[must_use]
    pub const fn kind(&self) -> InsightKind {
        match self {
            Self::TurningPoint(_) => InsightKind::TurningPoint,
            Self::Correlation(_) => InsightKind::Correlation,
            Self::CascadeMap(_) => InsightKind::CascadeMap,
            Self::FuturePrediction(_) => InsightKind::FuturePrediction,
            Self::ChallengePersistence(_) => InsightKind::ChallengePersistence,
            Self::TherapistSnapshot(_) => InsightKind::TherapistSnapshot,
        }
    }

    #[must_use]
    pub const fn base(&self) -> &InsightBase {
        match self {
            Self::TurningPoint(i) => &i.base,
            Self::Correlation(i) => &i.base,
            Self::CascadeMap(i) => &i.base,
            Self::FuturePrediction(i) => &i.base,
            Self::ChallengePersistence(i) => &i.base,
            Self::TherapistSnapshot(i) => &i.base,
        }
    }

    pub const fn base_mut(&mut self) -> &mut InsightBase {
        match self {
            Self::TurningPoint(i) => &mut i.base,
            Self::Correlation(i) => &mut i.base,
            Self::CascadeMap(i) => &mut i.base,
            Self::FuturePrediction(i) => &mut i.base,
            Self::ChallengePersistence(i) => &mut i.base,
            Self::TherapistSnapshot(i) => &mut i.base,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.base().id.as_deref()
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.base().user_id
    }

    /// Set the persistence-assigned ID.
    pub fn assign_id(&mut self, id: impl Into<String>) {
        self.base_mut().id = Some(id.into());
    }

    pub fn touch(&mut self, clock: &dyn Clock) {
        self.base_mut().touch(clock);
    }
}

impl Validate for Insight {
    fn check(&self, out: &mut Violations) {
        match self {
            Self::TurningPoint(i) => i.check(out),
            Self::Correlation(i) => i.check(out),
            Self::CascadeMap(i) => i.check(out),
            Self::FuturePrediction(i) => i.check(out),
            Self::ChallengePersistence(i) => i.check(out),
            Self::TherapistSnapshot(i) => i.check(out),
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Insight {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(
    TurningPoint,
    Correlation,
    CascadeMap,
    FuturePrediction,
    ChallengePersistence,
    TherapistSnapshot,
);
