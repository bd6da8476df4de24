use std::path::PathBuf;

use figment::Jail;
use journey_config::JourneyConfig;
use journey_core::enums::Strictness;

#[test]
fn env_vars_map_to_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("JOURNEY_VALIDATION__STRICTNESS", "lenient");
        jail.set_env("JOURNEY_STORE__DIR", "/tmp/journey-store");
        jail.set_env("JOURNEY_GENERAL__DEFAULT_LIMIT", "3");

        let config = JourneyConfig::load().expect("config loads");
        assert_eq!(config.validation.strictness, Strictness::Lenient);
        assert_eq!(config.store.dir, PathBuf::from("/tmp/journey-store"));
        assert_eq!(config.general.default_limit, 3);
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".journey")?;
        jail.create_file(".journey/config.toml", "[general]\ndefault_limit = 9\n")?;
        jail.set_env("JOURNEY_GENERAL__DEFAULT_LIMIT", "4");

        let config = JourneyConfig::load().expect("config loads");
        assert_eq!(config.general.default_limit, 4);
        Ok(())
    });
}

#[test]
fn dotenv_file_feeds_env_layer() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "JOURNEY_VALIDATION__STRICTNESS=lenient\n")?;

        let config = JourneyConfig::load_with_dotenv().expect("config loads");
        assert_eq!(config.validation.strictness, Strictness::Lenient);
        Ok(())
    });
}
