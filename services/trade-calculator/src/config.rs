//! Binary configuration
//!
//! Loaded from an optional `trade-calculator.{toml,yaml,json}` file in the
//! working directory, then `TRADE_CALC_*` environment variables. The engine
//! itself has no tunables.

use std::path::Path;

use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_STEM: &str = "trade-calculator";
pub const ENV_PREFIX: &str = "TRADE_CALC";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Default tracing level when RUST_LOG is unset
    pub log_level: String,
    /// Pretty-print JSON output (OR-ed with --pretty)
    pub pretty: bool,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pretty: false,
            log_json: false,
        }
    }
}

impl CliConfig {
    /// Load from `.env`, the working-directory config file and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_from(Path::new(CONFIG_FILE_STEM), ENV_PREFIX)
    }

    /// Load from a config file stem (extension optional) and env prefix
    pub fn load_from(file_stem: &Path, env_prefix: &str) -> Result<Self, config::ConfigError> {
        let defaults = CliConfig::default();

        config::Config::builder()
            .set_default("log_level", defaults.log_level)?
            .set_default("pretty", defaults.pretty)?
            .set_default("log_json", defaults.log_json)?
            .add_source(config::File::from(file_stem).required(false))
            .add_source(config::Environment::with_prefix(env_prefix))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            CliConfig::load_from(&dir.path().join("absent"), "TRADE_CALC_TEST_ABSENT").unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("trade-calculator.toml"),
            "log_level = \"debug\"\npretty = true\n",
        )
        .unwrap();

        let config = CliConfig::load_from(
            &dir.path().join(CONFIG_FILE_STEM),
            "TRADE_CALC_TEST_TOML",
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.pretty);
        assert!(!config.log_json);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("trade-calculator.json"), r#"{"log_json": false}"#).unwrap();
        std::env::set_var("TRADE_CALC_TEST_ENV_LOG_JSON", "true");

        let config = CliConfig::load_from(
            &dir.path().join(CONFIG_FILE_STEM),
            "TRADE_CALC_TEST_ENV",
        )
        .unwrap();
        assert!(config.log_json);
    }
}
