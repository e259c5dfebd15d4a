// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

//! Handles the application settings via a config file and environment variables.
use crate::cli::Args;
use arc_swap::ArcSwap;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub type SharedSettings = Arc<ArcSwap<Settings>>;

/// Reload the settings from the `config_path` & the environment
///
/// Only the reloadable subset is taken over; the HTTP listener keeps its
/// startup configuration while the controller is running.
pub(crate) fn reload_settings(
    shared_settings: SharedSettings,
    config_path: &Path,
) -> Result<(), ConfigError> {
    let new_settings = Settings::load(config_path)?;
    let mut current_settings = (*shared_settings.load_full()).clone();

    // reload extensions config
    current_settings.extensions = new_settings.extensions;

    // replace the shared settings with the modified ones
    shared_settings.store(Arc::new(current_settings));

    Ok(())
}

/// Loads settings from program arguments and config file
pub fn load_settings(args: &Args) -> Result<Settings, ConfigError> {
    Settings::load(&args.config)
}

/// Contains the application settings.
///
/// The application settings are set with a TOML config file. Settings specified in the config file
/// can be overwritten by environment variables. To do so, set an environment variable
/// with the prefix `MATCHDAY_CTRL_` followed by the field names you want to set. Nested fields are separated by two underscores `__`.
/// ```sh
/// MATCHDAY_CTRL_<field>__<field-of-field>...
/// ```
///
/// # Example
///
/// set the `http.port` field:
/// ```sh
/// MATCHDAY_CTRL_HTTP__PORT=8090
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub http: Http,
    #[serde(default)]
    pub logging: Logging,

    #[serde(flatten)]
    pub extensions: HashMap<String, config::Value>,
}

impl Settings {
    /// Creates a new Settings instance from the provided TOML file.
    /// Specific fields can be set or overwritten with environment variables (See struct level docs for more details).
    pub fn load(file_name: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(file_name).required(false))
            .add_source(Environment::with_prefix("MATCHDAY_CTRL").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Http {
    pub port: u16,
    pub cors: HttpCors,
}

impl Default for Http {
    fn default() -> Self {
        Self {
            port: 8090,
            cors: HttpCors::default(),
        }
    }
}

/// Settings for CORS (Cross Origin Resource Sharing)
///
/// The public join widget is embedded on third-party pages, so the allowed
/// origins are configurable per deployment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpCors {
    pub allowed_origin: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub default_directives: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let settings: Settings = serde_json::from_str("{}").unwrap();

        assert_eq!(settings.http.port, 8090);
        assert!(settings.http.cors.allowed_origin.is_empty());
        assert!(settings.logging.default_directives.is_empty());
    }
}
