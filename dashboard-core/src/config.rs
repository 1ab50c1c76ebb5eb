use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    catalog::{self, Location},
    controller::StalePolicy,
    geocode::DEFAULT_GEOCODING_URL,
    http::HttpPolicy,
    provider::DEFAULT_WEATHER_URL,
    units::TemperatureUnit,
};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "WEATHER_DASH_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// temperature_unit = "F"
/// default_region = "NG-FC"
/// timeout_secs = 10
/// retry_transient = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key. Sent as a plain query parameter.
    pub api_key: Option<String>,
    pub geocoding_url: String,
    pub weather_url: String,
    /// Per-request timeout; unset keeps the HTTP client default.
    pub timeout_secs: Option<u64>,
    /// Retry once on timeouts and connection errors.
    pub retry_transient: bool,
    /// Drop responses to superseded selections instead of showing them.
    pub latest_response_only: bool,
    pub temperature_unit: TemperatureUnit,
    /// Region code loaded on start.
    pub default_region: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            timeout_secs: None,
            retry_transient: false,
            latest_response_only: false,
            temperature_unit: TemperatureUnit::default(),
            default_region: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dash", "weather-dash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides taken from the process environment.
    pub fn with_env(self) -> Self {
        self.with_api_key_override(std::env::var(API_KEY_ENV).ok())
    }

    /// A non-blank override replaces the stored key.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
        self
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Returns the API key or an error telling the user how to set one.
    pub fn api_key(&self) -> Result<String> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `weather-dash configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn http_policy(&self) -> HttpPolicy {
        HttpPolicy {
            timeout: self.timeout_secs.map(Duration::from_secs),
            retry_transient: self.retry_transient,
        }
    }

    pub fn stale_policy(&self) -> StalePolicy {
        if self.latest_response_only {
            StalePolicy::LatestOnly
        } else {
            StalePolicy::LastWriteWins
        }
    }

    /// Location to load on start; Lagos when nothing is configured.
    pub fn default_location(&self) -> Result<Location> {
        match self.default_region.as_deref() {
            None => Ok(catalog::default_location()),
            Some(code) => catalog::find_by_code(code).ok_or_else(|| {
                anyhow!("Unknown default region '{code}'. Run `weather-dash regions` to list codes.")
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("weather-dash configure"));
        assert!(!cfg.is_configured());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(cfg.api_key().is_err());
    }

    #[test]
    fn env_override_replaces_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let cfg = cfg.with_api_key_override(Some(" ENV_KEY ".into()));
        assert_eq!(cfg.api_key().expect("key"), "ENV_KEY");
    }

    #[test]
    fn empty_env_override_is_ignored() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let cfg = cfg.with_api_key_override(Some(String::new()));
        assert_eq!(cfg.api_key().expect("key"), "FILE_KEY");
    }

    #[test]
    fn defaults_are_single_attempt_and_last_write_wins() {
        let cfg = Config::default();
        assert_eq!(cfg.http_policy(), HttpPolicy::default());
        assert_eq!(cfg.stale_policy(), StalePolicy::LastWriteWins);
        assert_eq!(cfg.weather_url, DEFAULT_WEATHER_URL);
        assert_eq!(cfg.geocoding_url, DEFAULT_GEOCODING_URL);
    }

    #[test]
    fn hardening_options_map_to_policies() {
        let cfg = Config {
            timeout_secs: Some(8),
            retry_transient: true,
            latest_response_only: true,
            ..Config::default()
        };
        assert_eq!(cfg.http_policy(), HttpPolicy::hardened(Duration::from_secs(8)));
        assert_eq!(cfg.stale_policy(), StalePolicy::LatestOnly);
    }

    #[test]
    fn default_location_falls_back_to_lagos() {
        let cfg = Config::default();
        assert_eq!(cfg.default_location().expect("lagos").region_code, "NG-LA");

        let cfg = Config {
            default_region: Some("ng-fc".into()),
            ..Config::default()
        };
        assert_eq!(cfg.default_location().expect("fct").lookup_name, "Abuja");

        let cfg = Config {
            default_region: Some("XX-YY".into()),
            ..Config::default()
        };
        assert!(cfg.default_location().is_err());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.temperature_unit = TemperatureUnit::Fahrenheit;
        cfg.default_region = Some("NG-KN".into());
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = Config::load_from(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "temperature_unit = \"F\"\n").expect("write");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.temperature_unit, TemperatureUnit::Fahrenheit);
        assert_eq!(loaded.weather_url, DEFAULT_WEATHER_URL);
        assert!(loaded.api_key.is_none());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "retry_transient = \"maybe\"\n").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
