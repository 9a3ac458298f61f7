//! OpenWeatherMap client
//!
//! HTTP client for the OpenWeatherMap current weather and forecast endpoints.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{
    CurrentResponse, CurrentWeather, ErrorResponse, ForecastData, ForecastItem, ForecastResponse,
    Units,
};

/// Timestamp layout of the forecast `dt_txt` field
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The API does not know the requested city (HTTP 404)
    #[error("City not found: {0}")]
    CityNotFound(String),

    /// The API key was rejected (HTTP 401)
    #[error("API key rejected by weather service")]
    Unauthorized,

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Service is temporarily unavailable (HTTP 5xx)
    #[error("Service unavailable: HTTP {0}")]
    ServiceUnavailable(u16),

    /// Any other non-success status
    #[error("Request failed: HTTP {status}: {message}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Message from the error body, if any
        message: String,
    },

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Client configuration is unusable
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl WeatherError {
    /// HTTP status code behind this error, if the service answered at all
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::CityNotFound(_) => Some(404),
            Self::Unauthorized => Some(401),
            Self::RateLimitExceeded => Some(429),
            Self::ServiceUnavailable(status) | Self::RequestFailed { status, .. } => Some(*status),
            Self::Timeout(_)
            | Self::ConnectionFailed(_)
            | Self::ParseError(_)
            | Self::Configuration(_) => None,
        }
    }
}

/// Weather service configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// API base URL (default: <https://api.openweathermap.org/data/2.5>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as the `appid` parameter
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Weather client trait for fetching weather data by city name
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Get current conditions for a city
    async fn get_current(&self, city: &str, units: Units) -> Result<CurrentWeather, WeatherError>;

    /// Get the 3-hour forecast list for a city, in feed order
    async fn get_forecast(
        &self,
        city: &str,
        units: Units,
    ) -> Result<Vec<ForecastItem>, WeatherError>;
}

/// OpenWeatherMap HTTP client implementation
#[derive(Debug)]
pub struct OpenWeatherMapClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenWeatherMapClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be
    /// initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        if config.api_key.trim().is_empty() {
            return Err(WeatherError::Configuration(
                "weather API key is not set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Build the URL of an endpoint below the base URL
    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    /// Issue a GET against an endpoint and reject non-success statuses
    async fn send(&self, endpoint: &str, city: &str, units: Units) -> Result<Response, WeatherError> {
        let url = self.endpoint_url(endpoint);
        debug!(url = %url, units = units.as_query(), "Requesting weather data");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("units", units.as_query()),
                ("appid", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Self::map_status(status, city, &body))
    }

    /// Map a non-success status to an error
    fn map_status(status: StatusCode, city: &str, body: &str) -> WeatherError {
        match status {
            StatusCode::NOT_FOUND => WeatherError::CityNotFound(city.to_string()),
            StatusCode::UNAUTHORIZED => WeatherError::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => WeatherError::RateLimitExceeded,
            s if s.is_server_error() => WeatherError::ServiceUnavailable(s.as_u16()),
            s => {
                let message = serde_json::from_str::<ErrorResponse>(body)
                    .ok()
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| body.to_string());
                WeatherError::RequestFailed {
                    status: s.as_u16(),
                    message,
                }
            },
        }
    }

    /// Map a reqwest failure; the URL is stripped because it carries the key
    fn map_transport_error(err: reqwest::Error) -> WeatherError {
        let err = err.without_url();
        if err.is_timeout() {
            WeatherError::Timeout(err.to_string())
        } else if err.is_decode() {
            WeatherError::ParseError(err.to_string())
        } else {
            WeatherError::ConnectionFailed(err.to_string())
        }
    }

    /// Parse a forecast `dt_txt` value
    fn parse_timestamp(s: &str) -> Result<NaiveDateTime, WeatherError> {
        NaiveDateTime::parse_from_str(s, DT_TXT_FORMAT)
            .map_err(|e| WeatherError::ParseError(format!("Invalid forecast timestamp '{s}': {e}")))
    }

    /// Convert the current conditions wire format
    fn parse_current_weather(response: CurrentResponse, city: &str) -> CurrentWeather {
        let main = response.main.unwrap_or_default();
        CurrentWeather {
            location_name: response
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| city.to_string()),
            temperature: main.temp,
            humidity: main.humidity,
            wind_speed: response.wind.and_then(|w| w.speed),
        }
    }

    /// Convert the forecast list wire format
    fn parse_forecast_items(list: Vec<ForecastData>) -> Result<Vec<ForecastItem>, WeatherError> {
        list.into_iter()
            .map(|data| {
                let main = data.main.unwrap_or_default();
                Ok(ForecastItem {
                    time: Self::parse_timestamp(&data.dt_txt)?,
                    temperature: main.temp,
                    humidity: main.humidity,
                    wind_speed: data.wind.and_then(|w| w.speed),
                })
            })
            .collect()
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherMapClient {
    #[instrument(skip(self), fields(units = units.as_query()))]
    async fn get_current(&self, city: &str, units: Units) -> Result<CurrentWeather, WeatherError> {
        let response: CurrentResponse = self
            .send("weather", city, units)
            .await?
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.without_url().to_string()))?;

        Ok(Self::parse_current_weather(response, city))
    }

    #[instrument(skip(self), fields(units = units.as_query()))]
    async fn get_forecast(
        &self,
        city: &str,
        units: Units,
    ) -> Result<Vec<ForecastItem>, WeatherError> {
        let response: ForecastResponse = self
            .send("forecast", city, units)
            .await?
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.without_url().to_string()))?;

        let items = Self::parse_forecast_items(response.list)?;
        debug!(entries = items.len(), "Parsed forecast list");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MainData, WindData};

    fn test_config() -> WeatherConfig {
        WeatherConfig {
            api_key: "test-key".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = WeatherConfig::default();
        assert_eq!(config.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = WeatherConfig {
            api_key: "super-secret".to_string(),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_config_serialization_skips_key() {
        let json = serde_json::to_string(&test_config()).expect("should serialize");
        assert!(!json.contains("test-key"));

        let back: WeatherConfig =
            serde_json::from_str(r#"{"api_key":"abc"}"#).expect("should deserialize");
        assert_eq!(back.api_key, "abc");
        assert_eq!(back.timeout_secs, 10);
    }

    #[test]
    fn test_client_requires_api_key() {
        let result = OpenWeatherMapClient::new(WeatherConfig::default());
        assert!(matches!(result, Err(WeatherError::Configuration(_))));
    }

    #[test]
    fn test_client_creation() {
        assert!(OpenWeatherMapClient::new(test_config()).is_ok());
    }

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        let client = OpenWeatherMapClient::new(WeatherConfig {
            base_url: "http://localhost:9000/".to_string(),
            ..test_config()
        })
        .expect("client creation should succeed");
        assert_eq!(client.endpoint_url("weather"), "http://localhost:9000/weather");
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = OpenWeatherMapClient::parse_timestamp("2024-01-15 12:00:00").expect("should parse");
        assert_eq!(ts.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 12:00");
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert!(OpenWeatherMapClient::parse_timestamp("2024-01-15T12:00").is_err());
        assert!(OpenWeatherMapClient::parse_timestamp("noon").is_err());
    }

    #[test]
    fn test_parse_current_weather_falls_back_to_query() {
        let response = CurrentResponse {
            name: None,
            main: Some(MainData {
                temp: Some(21.5),
                humidity: None,
            }),
            wind: None,
        };
        let weather = OpenWeatherMapClient::parse_current_weather(response, "Falakata");
        assert_eq!(weather.location_name, "Falakata");
        assert_eq!(weather.temperature, Some(21.5));
        assert_eq!(weather.humidity, None);
        assert_eq!(weather.wind_speed, None);
    }

    #[test]
    fn test_parse_forecast_items() {
        let list = vec![ForecastData {
            dt_txt: "2024-01-15 15:00:00".to_string(),
            main: None,
            wind: Some(WindData { speed: Some(3.0) }),
        }];
        let items = OpenWeatherMapClient::parse_forecast_items(list).expect("should parse");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].wind_speed, Some(3.0));
        assert_eq!(items[0].temperature, None);
    }

    #[test]
    fn test_map_status() {
        assert!(matches!(
            OpenWeatherMapClient::map_status(StatusCode::NOT_FOUND, "Atlantis", ""),
            WeatherError::CityNotFound(ref city) if city == "Atlantis"
        ));
        assert!(matches!(
            OpenWeatherMapClient::map_status(StatusCode::UNAUTHORIZED, "x", ""),
            WeatherError::Unauthorized
        ));
        assert!(matches!(
            OpenWeatherMapClient::map_status(StatusCode::BAD_GATEWAY, "x", ""),
            WeatherError::ServiceUnavailable(502)
        ));
        assert!(matches!(
            OpenWeatherMapClient::map_status(
                StatusCode::BAD_REQUEST,
                "x",
                r#"{"cod":"400","message":"Nothing to geocode"}"#
            ),
            WeatherError::RequestFailed { status: 400, ref message } if message == "Nothing to geocode"
        ));
    }

    #[test]
    fn test_status_code() {
        assert_eq!(WeatherError::CityNotFound("x".into()).status_code(), Some(404));
        assert_eq!(WeatherError::RateLimitExceeded.status_code(), Some(429));
        assert_eq!(WeatherError::ServiceUnavailable(503).status_code(), Some(503));
        assert_eq!(WeatherError::Timeout("slow".into()).status_code(), None);
    }

    #[test]
    fn test_weather_error_display() {
        assert!(WeatherError::RateLimitExceeded.to_string().contains("Rate limit"));
        assert!(
            WeatherError::CityNotFound("Atlantis".into())
                .to_string()
                .contains("Atlantis")
        );
    }
}
