//! Handles the application settings via a config file and environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;
use validator::{Validate, ValidationErrors};

/// Contains the application settings.
///
/// The application settings are set with an optional TOML config file. Settings specified in the
/// config file can be overwritten by environment variables. To do so, set an environment variable
/// with the prefix `ROSTER_` followed by the field names you want to set. Nested fields are
/// separated by a double underscore `__`.
/// ```text
/// ROSTER_<field>__<field-of-field>...
/// ```
/// # Example
///
/// set the `api.base_url` field:
/// ```text
/// ROSTER_API__BASE_URL=http://school.example/
/// ```
/// # Note
/// Fields set via environment variables do not affect the underlying config file.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate]
    pub api: Api,
    #[serde(default)]
    #[validate]
    pub banner: BannerSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid settings: {0}")]
    Invalid(#[from] ValidationErrors),
}

impl Settings {
    /// Creates a new Settings instance from the provided TOML file, which may be absent.
    /// Specific fields can be set or overwritten with environment variables (See struct level docs
    /// for more details).
    pub fn load(file_name: &Path) -> Result<Self, SettingsError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(file_name).required(false))
            .add_source(
                Environment::with_prefix("ROSTER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }
}

/// Where and how to reach the activities API
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Api {
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Api {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BannerSettings {
    /// How long an outcome message stays visible, in milliseconds
    #[serde(default = "default_hide_after_ms")]
    #[validate(range(min = 1))]
    pub hide_after_ms: u64,
}

impl Default for BannerSettings {
    fn default() -> Self {
        Self {
            hide_after_ms: default_hide_after_ms(),
        }
    }
}

impl BannerSettings {
    pub fn hide_after(&self) -> Duration {
        Duration::from_millis(self.hide_after_ms)
    }
}

fn default_base_url() -> Url {
    Url::parse("http://localhost:8000/").expect("default base url is valid")
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_hide_after_ms() -> u64 {
    5000
}
