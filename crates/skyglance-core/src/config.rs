use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote endpoints and lookup settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Fixed position used for the startup lookup
    #[serde(default)]
    pub location: LocationConfig,

    /// Where cached snapshots are kept
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Geocoding search endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Display locale requested from the geocoder
    #[serde(default = "default_language")]
    pub language: String,

    /// Locale for weekday and date labels, e.g. `ar_EG` or `en_US`
    #[serde(default = "default_date_locale")]
    pub date_locale: String,

    /// Base path for condition icons
    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,

    /// How long a cached snapshot stays fresh
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,

    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_language() -> String {
    "ar".to_string()
}

fn default_date_locale() -> String {
    "ar_EG".to_string()
}

fn default_icon_base_url() -> String {
    "https://openweathermap.org/img/wn".to_string()
}

fn default_cache_ttl_seconds() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            language: default_language(),
            date_locale: default_date_locale(),
            icon_base_url: default_icon_base_url(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl WeatherConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The configured date locale, if chrono knows it
    pub fn locale(&self) -> Option<chrono::Locale> {
        chrono::Locale::try_from(self.date_locale.as_str()).ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Fixed latitude for the startup lookup; both coordinates must be set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Label shown for position-based lookups
    #[serde(default = "default_location_label")]
    pub label: String,
}

fn default_location_label() -> String {
    "Your current location".to_string()
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            label: default_location_label(),
        }
    }
}

impl LocationConfig {
    /// The configured position, if both coordinates are present
    pub fn position(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Override for the cache directory (defaults to the platform cache dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    pub fn effective_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("skyglance")
        })
    }
}

impl Config {
    /// Load configuration from the default path, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors abort loading.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.weather.geocoding_url, "weather.geocoding_url", &mut result);
        validate_url(&self.weather.forecast_url, "weather.forecast_url", &mut result);
        validate_url(&self.weather.icon_base_url, "weather.icon_base_url", &mut result);

        if self.weather.language.trim().is_empty() {
            result.add_error("weather.language", "Language must not be empty");
        }

        if self.weather.locale().is_none() {
            result.add_error(
                "weather.date_locale",
                format!("Unknown locale: {}", self.weather.date_locale),
            );
        }

        if self.weather.cache_ttl_seconds == 0 {
            result.add_warning(
                "weather.cache_ttl_seconds",
                "Caching disabled (0 seconds)",
            );
        } else if self.weather.cache_ttl_seconds > 86_400 {
            result.add_warning(
                "weather.cache_ttl_seconds",
                "Cache lifetime is more than 24 hours",
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("location.latitude", "Latitude must be within -90..=90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error("location.longitude", "Longitude must be within -180..=180");
                }
            }
            (None, None) => {}
            _ => result.add_warning(
                "location",
                "Only one coordinate is set; position lookup disabled",
            ),
        }

        result
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        std::fs::write(path, contents)?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("no platform config directory".into()))?
            .join("skyglance");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_default_ttl_is_ten_minutes() {
        let config = Config::default();
        assert_eq!(config.weather.cache_ttl(), Duration::from_millis(600_000));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.weather.forecast_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.forecast_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.geocoding_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let mut config = Config::default();
        config.weather.request_timeout_secs = 0;
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_date_locale_must_be_known() {
        let mut config = Config::default();
        assert_eq!(config.weather.locale(), Some(chrono::Locale::ar_EG));

        config.weather.date_locale = "en_US".into();
        assert!(config.validate().is_valid());

        config.weather.date_locale = "xx_NOPE".into();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "weather.date_locale"));
    }

    #[test]
    fn test_out_of_range_position() {
        let mut config = Config::default();
        config.location.latitude = Some(91.0);
        config.location.longitude = Some(10.0);
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "location.latitude"));
    }

    #[test]
    fn test_half_configured_position_warns() {
        let mut config = Config::default();
        config.location.latitude = Some(30.0);
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "location"));
        assert!(config.location.position().is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [location]
            latitude = 30.04
            longitude = 31.24
            "#,
        )
        .unwrap();
        assert_eq!(config.location.position(), Some((30.04, 31.24)));
        assert_eq!(config.location.label, "Your current location");
        assert_eq!(config.weather.language, "ar");
        assert_eq!(config.weather.cache_ttl_seconds, 600);
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.weather.forecast_url, default_forecast_url());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.weather.geocoding_url, config.weather.geocoding_url);
    }

    #[test]
    fn test_load_validated_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[weather]\nforecast_url = \"nope\"\n").unwrap();

        let err = Config::load_validated(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("weather.forecast_url"));
    }

    #[test]
    fn test_load_from_reports_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[weather\nlanguage = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_load_from_reports_unreadable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be cannot be read as text
        let path = dir.path().join("config.toml");
        std::fs::create_dir(&path).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
