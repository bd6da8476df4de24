//! Entity structs for every insight variant.
//!
//! Each variant flattens [`InsightBase`] so the wire shape is a single flat
//! object. All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for
//! JSON roundtrip and schema validation, and implement
//! [`Validate`](crate::validation::Validate) for the rules serde cannot express.

mod base;
mod cascade;
mod challenge;
mod correlation;
mod prediction;
mod snapshot;
mod turning_point;

pub use base::InsightBase;
pub use cascade::{CascadeEdge, CascadeMap, CascadeNode};
pub use challenge::{ChallengeBadge, ChallengePersistence};
pub use correlation::Correlation;
pub use prediction::{FuturePrediction, RelatedEmotion, TopicPrediction};
pub use snapshot::{SnapshotSection, TherapistSnapshot};
pub use turning_point::TurningPoint;
