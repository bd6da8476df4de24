use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use journey_config::JourneyConfig;
use journey_core::enums::Strictness;
use journey_schema::InsightCodec;
use journey_store::JsonlStore;

use crate::cli::GlobalFlags;

/// Everything a command handler needs: resolved config and a codec built
/// with the effective strictness.
pub struct AppContext {
    pub config: JourneyConfig,
    pub codec: Arc<InsightCodec>,
    store_dir: PathBuf,
}

impl AppContext {
    pub fn init(config: JourneyConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let strictness = if flags.lenient {
            Strictness::Lenient
        } else {
            config.validation.strictness
        };
        let codec = InsightCodec::new(strictness).context("failed to build insight codec")?;
        let store_dir = flags
            .store
            .clone()
            .unwrap_or_else(|| config.store.dir.clone());
        tracing::debug!(%strictness, store = %store_dir.display(), "context ready");
        Ok(Self {
            config,
            codec: Arc::new(codec),
            store_dir,
        })
    }

    pub fn open_store(&self) -> anyhow::Result<JsonlStore> {
        JsonlStore::open(&self.store_dir, Arc::clone(&self.codec))
            .with_context(|| format!("failed to open store at {}", self.store_dir.display()))
    }

    /// Result limit for list commands: `--limit`, else `general.default_limit`.
    pub fn limit(&self, flags: &GlobalFlags) -> usize {
        flags.limit.unwrap_or(self.config.general.default_limit) as usize
    }
}
