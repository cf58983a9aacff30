use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::provider::openweather::DEFAULT_BASE_URL;

/// Overrides the stored key when set.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
/// base_url = "https://api.openweathermap.org/data/2.5"
/// timeout_secs = 10
/// default_location = "Bangalore"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// No timeout when absent or zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// City used when a command is run without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_location: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: None,
            default_location: None,
        }
    }
}

impl Config {
    /// Returns the API key, or an error telling the user how to set one.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather configure` or set {API_KEY_ENV}."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs)
    }

    /// Picks the explicit city if given, else the configured default location.
    pub fn resolve_location(&self, city: Option<String>) -> Result<String> {
        city.or_else(|| self.default_location.clone().filter(|loc| !loc.is_empty())).ok_or_else(
            || {
                anyhow!(
                    "No city given and no default location configured.\n\
                     Hint: pass a city or run `weather configure`."
                )
            },
        )
    }

    /// Load config from the platform config directory with the environment override applied.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_from(&Self::config_file_path()?)?;
        cfg.apply_env_override(std::env::var(API_KEY_ENV).ok());
        Ok(cfg)
    }

    /// Load config from `path`, or return defaults if it doesn't exist yet.
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

    /// Save config to `path`, creating parent directories as needed.
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
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn apply_env_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|key| !key.is_empty()) {
            self.api_key = Some(key);
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
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key(String::new());

        assert!(cfg.api_key().is_err());
    }

    #[test]
    fn defaults_point_at_openweather_without_timeout() {
        let cfg = Config::default();

        assert_eq!(cfg.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn zero_timeout_means_no_timeout() {
        let mut cfg = Config::default();

        cfg.timeout_secs = Some(0);
        assert_eq!(cfg.timeout(), None);

        cfg.timeout_secs = Some(3);
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn explicit_city_wins_over_default_location() {
        let mut cfg = Config::default();
        cfg.default_location = Some("Bangalore".into());

        assert_eq!(cfg.resolve_location(Some("Oslo".into())).unwrap(), "Oslo");
        assert_eq!(cfg.resolve_location(None).unwrap(), "Bangalore");
    }

    #[test]
    fn explicit_empty_city_is_kept() {
        let mut cfg = Config::default();
        cfg.default_location = Some("Bangalore".into());

        assert_eq!(cfg.resolve_location(Some(String::new())).unwrap(), "");
    }

    #[test]
    fn missing_city_and_default_is_an_error() {
        let err = Config::default().resolve_location(None).unwrap_err();
        assert!(err.to_string().contains("No city given"));
    }

    #[test]
    fn env_override_replaces_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        cfg.apply_env_override(None);
        assert_eq!(cfg.api_key().unwrap(), "FILE_KEY");

        cfg.apply_env_override(Some(String::new()));
        assert_eq!(cfg.api_key().unwrap(), "FILE_KEY");

        cfg.apply_env_override(Some("ENV_KEY".into()));
        assert_eq!(cfg.api_key().unwrap(), "ENV_KEY");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());
        cfg.timeout_secs = Some(5);
        cfg.default_location = Some("Bangalore".into());
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"K\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.api_key().unwrap(), "K");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
