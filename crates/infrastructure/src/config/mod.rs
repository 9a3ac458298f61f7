//! Application configuration
//!
//! Loaded from an optional `config.toml` and `WEATHER_LOOKUP_*` environment
//! variables (`__` separates nested keys, e.g. `WEATHER_LOOKUP_WEATHER__API_KEY`).

use std::{fmt, path::Path};

use domain::{CityName, DomainError, UnitSystem};
use integration_weather::WeatherConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "WEATHER_LOOKUP";

/// Largest forecast window the upstream feed covers
pub const MAX_FORECAST_DAYS: usize = 5;

/// Reasons a loaded configuration is unusable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// No API key from any source
    #[error("weather API key missing: set weather.api_key or WEATHER_LOOKUP_WEATHER__API_KEY")]
    MissingApiKey,

    /// Base URL is not an http(s) URL
    #[error("weather.base_url must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),

    /// Zero request timeout
    #[error("weather.timeout_secs must be greater than zero")]
    ZeroTimeout,

    /// Forecast window outside 1..=5
    #[error("lookup.forecast_days must be between 1 and 5, got {0}")]
    ForecastDaysOutOfRange(usize),

    /// Blank default city
    #[error("lookup.default_city: {0}")]
    DefaultCity(#[from] DomainError),
}

/// OpenWeatherMap connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherAppConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for WeatherAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherAppConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for WeatherAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WeatherAppConfig {
    /// Convert to `integration_weather`'s `WeatherConfig`
    #[must_use]
    pub fn to_weather_config(&self) -> WeatherConfig {
        WeatherConfig {
            base_url: self.base_url.clone(),
            api_key: self
                .api_key
                .as_ref()
                .map(|k| k.expose_secret().to_string())
                .unwrap_or_default(),
            timeout_secs: self.timeout_secs,
        }
    }

    fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }
}

/// Lookup session defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// City loaded when a session starts
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Unit system a session starts in
    #[serde(default)]
    pub default_units: UnitSystem,

    /// Number of daily forecast entries to show
    #[serde(default = "default_forecast_days")]
    pub forecast_days: usize,
}

fn default_city() -> String {
    "Falakata".to_string()
}

const fn default_forecast_days() -> usize {
    4
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            default_units: UnitSystem::default(),
            forecast_days: default_forecast_days(),
        }
    }
}

impl LookupConfig {
    /// Validated default city
    pub fn default_city(&self) -> Result<CityName, DomainError> {
        CityName::new(&self.default_city)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info", "application=debug")
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Weather service connection
    #[serde(default)]
    pub weather: WeatherAppConfig,

    /// Lookup defaults
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (required to exist) or the
    /// default `config.toml` (optional), then apply environment overrides
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::build(path, env_source())
    }

    fn build(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?;

        let app: Self = config.try_deserialize()?;
        debug!(config = ?app, "Configuration loaded");
        Ok(app)
    }

    /// Replace the API key, e.g. with one passed on the command line
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.weather.api_key = Some(SecretString::from(key.into()));
    }

    /// Check the configuration for unusable values
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.weather.has_api_key() {
            return Err(ConfigValidationError::MissingApiKey);
        }

        let url = self.weather.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidBaseUrl(url.to_string()));
        }

        if self.weather.timeout_secs == 0 {
            return Err(ConfigValidationError::ZeroTimeout);
        }

        let days = self.lookup.forecast_days;
        if !(1..=MAX_FORECAST_DAYS).contains(&days) {
            return Err(ConfigValidationError::ForecastDaysOutOfRange(days));
        }

        self.lookup.default_city()?;
        Ok(())
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
