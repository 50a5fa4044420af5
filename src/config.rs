//! User settings from `config.toml`, environment overrides on top

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::DEFAULT_API_URL;
use crate::compare::ComparisonProvider;
use crate::currency;
use crate::error::ConfigError;

pub const CONFIG_FILENAME: &str = "config.toml";
pub const API_KEY_ENV: &str = "FLIGHTLIST_API_KEY";
pub const COUNTRY_ENV: &str = "FLIGHTLIST_COUNTRY";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sent as the `apikey` header
    pub api_key: String,
    pub api_url: String,
    /// Page generator endpoint; no notification when unset
    pub generate_url: Option<String>,
    /// Country code standing in for a detected location
    pub country: Option<String>,
    /// Currencies offered by the selector
    pub currencies: Vec<String>,
    /// Overrides the country-derived currency
    pub currency: Option<String>,
    pub comparison: ComparisonProvider,
    /// Search as soon as the app starts
    pub autostart: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            generate_url: None,
            country: None,
            currencies: currency::default_offered(),
            currency: None,
            comparison: ComparisonProvider::default(),
            autostart: false,
        }
    }
}

impl Settings {
    /// Apply `FLIGHTLIST_API_KEY` / `FLIGHTLIST_COUNTRY`
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_key = key.trim().to_string();
        }
        if let Some(country) = lookup(COUNTRY_ENV).filter(|v| !v.trim().is_empty()) {
            self.country = Some(country.trim().to_ascii_uppercase());
        }
        self
    }

    /// Currency the form starts with
    pub fn initial_currency(&self) -> String {
        match &self.currency {
            Some(code) if self.currencies.iter().any(|c| c == code) => code.clone(),
            _ => currency::currency_for_country(self.country.as_deref(), &self.currencies),
        }
    }
}

/// `<config dir>/flightlist/config.toml`
pub fn config_path() -> Result<PathBuf, ConfigError> {
    dirs_next::config_dir()
        .map(|dir| dir.join("flightlist").join(CONFIG_FILENAME))
        .ok_or(ConfigError::NoConfigDir)
}

pub fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings, falling back to defaults when the file is missing or invalid
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Settings::default();
    }

    match read_settings(path) {
        Ok(mut settings) => {
            if settings.currencies.is_empty() {
                warn!("{:?} offers no currencies, using the built-in list", path);
                settings.currencies = currency::default_offered();
            }
            debug!("Loaded settings from {:?}", path);
            settings
        }
        Err(e) => {
            warn!("{}", e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(&dir.path().join(CONFIG_FILENAME));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
api_key = "secret"
country = "DE"
comparison = "disabled"
currencies = ["EUR", "USD"]
"#,
        )
        .unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.comparison, ComparisonProvider::Disabled);
        assert_eq!(settings.generate_url, None);
        assert_eq!(settings.initial_currency(), "EUR");
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "api_key = [").unwrap();

        assert!(matches!(
            read_settings(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::default().with_overrides_from(|name| match name {
            API_KEY_ENV => Some(" abc ".to_string()),
            COUNTRY_ENV => Some("gb".to_string()),
            _ => None,
        });
        assert_eq!(settings.api_key, "abc");
        assert_eq!(settings.country.as_deref(), Some("GB"));
        assert_eq!(settings.initial_currency(), "GBP");
    }

    #[test]
    fn test_currency_override_must_be_offered() {
        let settings = Settings {
            currency: Some("HUF".into()),
            country: Some("FR".into()),
            ..Settings::default()
        };
        assert_eq!(settings.initial_currency(), "EUR");
    }
}
