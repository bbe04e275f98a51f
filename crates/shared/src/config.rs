//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Aggregation engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Report front-end configuration.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Aggregation engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// IANA timezone used to bucket instants into calendar dates.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// ISO 4217 code used when formatting amounts.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            currency: default_currency(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Report front-end configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Transaction file to read when none is given on the command line.
    #[serde(default)]
    pub input: Option<PathBuf>,
    /// Emit JSON instead of text tables.
    #[serde(default)]
    pub json: bool,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources are layered `config/default`, `config/{RUN_MODE}`, then
    /// `TALLY__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
