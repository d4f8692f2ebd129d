use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::WeatherError;

/// Environment variable holding the OpenWeatherMap API key.
pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration, loaded once at startup and never mutated.
///
/// Every field has a default, so a missing config file yields a working
/// configuration and a file only needs to name the fields it overrides:
///
/// ```toml
/// [api]
/// timeout = 5
///
/// [defaults]
/// language = "ja"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub defaults: DefaultsConfig,
}

/// Provider endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in seconds. The sole bound on how long a fetch may
    /// block.
    pub timeout: u64,
    /// Unit system passed to the provider, e.g. "metric".
    pub units: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            timeout: 10,
            units: "metric".to_string(),
        }
    }
}

/// User-facing defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Language code sent to the provider when a lookup doesn't specify one.
    pub language: String,
    /// City offered by the interactive prompt.
    pub city: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            city: "Tokyo".to_string(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse; without one, the platform
    /// config directory is consulted and a missing file falls back to the
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(anyhow!("config file not found: {}", p.display()));
                }
                p.to_path_buf()
            }
            None => {
                let p = Self::config_file_path()?;
                if !p.exists() {
                    return Ok(Self::default());
                }
                p
            }
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file in the platform config directory.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-app", "weather")
            .ok_or_else(|| anyhow!("could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout)
    }
}

/// Read the API key from the environment. Absence is a hard failure: the
/// client cannot be constructed without a credential.
pub fn api_key_from_env() -> Result<String, WeatherError> {
    api_key_from(env::var(API_KEY_VAR).ok())
}

fn api_key_from(value: Option<String>) -> Result<String, WeatherError> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(WeatherError::InvalidCredential(format!(
            "environment variable {API_KEY_VAR} is not set"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WeatherError;

    #[test]
    fn defaults_match_the_documented_values() {
        let cfg = Config::default();

        assert_eq!(cfg.api.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(cfg.api.timeout, 10);
        assert_eq!(cfg.api.units, "metric");
        assert_eq!(cfg.defaults.language, "en");
        assert_eq!(cfg.defaults.city, "Tokyo");
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let cfg: Config = toml::from_str(
            r#"
            [api]
            timeout = 5

            [defaults]
            language = "ja"
            "#,
        )
        .expect("parse");

        assert_eq!(cfg.api.timeout, 5);
        assert_eq!(cfg.defaults.language, "ja");
        assert_eq!(cfg.api.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(cfg.api.units, "metric");
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg: Config = toml::from_str("").expect("parse");
        assert_eq!(cfg.api.timeout, 10);
    }

    #[test]
    fn timeout_converts_to_duration() {
        let mut cfg = Config::default();
        cfg.api.timeout = 3;
        assert_eq!(cfg.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn missing_api_key_is_a_credential_error() {
        let err = api_key_from(None).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidCredential(_)));
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn blank_api_key_is_a_credential_error() {
        let err = api_key_from(Some("   ".to_string())).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidCredential(_)));
    }

    #[test]
    fn present_api_key_is_returned() {
        let key = api_key_from(Some("secret".to_string())).expect("key");
        assert_eq!(key, "secret");
    }
}
