//! Construction policy.

use journey_core::enums::Strictness;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// `strict` rejects undeclared fields, `lenient` drops them.
    #[serde(default)]
    pub strictness: Strictness,
}
