//! # journey-config
//!
//! Layered configuration loading for Insight Journey using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`JOURNEY_*` prefix, `__` as separator)
//! 2. Project-level `.journey/config.toml`
//! 3. User-level `~/.config/journey/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `JOURNEY_VALIDATION__STRICTNESS` -> `validation.strictness`,
//! `JOURNEY_STORE__DIR` -> `store.dir`, etc. The `__` (double underscore)
//! separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use journey_config::JourneyConfig;
//!
//! let config = JourneyConfig::load_with_dotenv().expect("config");
//! println!("store: {}", config.store.dir.display());
//! ```

mod error;
mod general;
mod store;
mod validation;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use store::StoreConfig;
pub use validation::ValidationConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = ".journey/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JourneyConfig {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl JourneyConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`load_with_dotenv`](Self::load_with_dotenv)
    /// if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse, or
    /// `ConfigError::InvalidValue` if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env is fine.
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and check a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.check()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(LOCAL_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("JOURNEY_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("journey").join("config.toml"))
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.general.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.default_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.store.dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.dir".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journey_core::enums::Strictness;

    #[test]
    fn default_config_is_strict() {
        let config = JourneyConfig::default();
        assert_eq!(config.validation.strictness, Strictness::Strict);
        assert_eq!(config.store.dir, PathBuf::from(".journey/store"));
        assert_eq!(config.general.default_limit, 20);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let mut config = JourneyConfig::default();
        config.general.default_limit = 0;
        assert!(matches!(
            config.check(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "general.default_limit"
        ));
    }
}
