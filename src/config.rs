//! Runtime configuration.
//!
//! Layered: built-in defaults, then an optional TOML file, then environment
//! overrides.
//!
//! ```toml
//! # launch-dash.toml
//! data_path = "spacex_launch_dash.csv"
//! host = "0.0.0.0"
//! port = 8080
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "launch-dash.toml";

pub const ENV_CONFIG: &str = "LAUNCH_DASH_CONFIG";
pub const ENV_DATA: &str = "LAUNCH_DASH_DATA";
pub const ENV_HOST: &str = "LAUNCH_DASH_HOST";
pub const ENV_PORT: &str = "LAUNCH_DASH_PORT";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Dataset file, loaded once at startup.
    pub data_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("spacex_launch_dash.csv"),
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    /// Resolve the configuration from the process environment.
    ///
    /// Returns the config together with the file it was read from, if any.
    pub fn load() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();

        let explicit = lookup(ENV_CONFIG).map(PathBuf::from);
        let file = match explicit {
            Some(path) => Some(path),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        let mut config = match &file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        Ok((config, file))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `LAUNCH_DASH_*` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATA) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.parse().map_err(|_| ConfigError::InvalidOverride {
                key: ENV_PORT,
                value: port,
            })?;
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
