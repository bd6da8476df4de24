//! Insight store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Directory holding `insights.jsonl`, relative to the working directory
/// unless absolute.
fn default_dir() -> PathBuf {
    PathBuf::from(".journey/store")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}
