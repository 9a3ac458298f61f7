//! Weather adapter - Implements WeatherPort using integration_weather

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{CurrentConditions, ForecastEntry, WeatherPort};
use async_trait::async_trait;
use domain::{CityName, Humidity, UnitSystem};
use integration_weather::{
    CurrentWeather, ForecastItem, OpenWeatherMapClient, Units, WeatherClient, WeatherConfig,
    WeatherError,
};
use tracing::{debug, instrument};

/// Adapter for weather lookups against OpenWeatherMap
pub struct WeatherAdapter {
    client: Arc<dyn WeatherClient>,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter")
            .field("client", &"WeatherClient")
            .finish()
    }
}

impl WeatherAdapter {
    /// Create with the given client configuration
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the API key is missing or
    /// the HTTP client fails to initialize.
    pub fn with_config(config: WeatherConfig) -> Result<Self, ApplicationError> {
        let client = OpenWeatherMapClient::new(config).map_err(Self::map_error)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Wrap an existing weather client
    pub fn with_client(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::CityNotFound(city) => ApplicationError::NotFound(city),
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
            WeatherError::RequestFailed { status, message } => {
                ApplicationError::Upstream { status, message }
            },
            WeatherError::Timeout(e) => ApplicationError::Timeout(e),
            WeatherError::ConnectionFailed(e) => ApplicationError::ExternalService(e),
            WeatherError::ParseError(e) => {
                ApplicationError::ExternalService(format!("invalid response: {e}"))
            },
            WeatherError::Configuration(e) => ApplicationError::Configuration(e),
            other => match other.status_code() {
                Some(status) => ApplicationError::Upstream {
                    status,
                    message: other.to_string(),
                },
                None => ApplicationError::ExternalService(other.to_string()),
            },
        }
    }

    const fn map_units(unit: UnitSystem) -> Units {
        match unit {
            UnitSystem::Metric => Units::Metric,
            UnitSystem::Imperial => Units::Imperial,
        }
    }

    fn map_current(current: CurrentWeather) -> CurrentConditions {
        CurrentConditions {
            location_name: current.location_name,
            temperature: current.temperature,
            humidity: current.humidity.map(Humidity::from_reading),
            wind_speed: current.wind_speed,
        }
    }

    fn map_entry(item: ForecastItem) -> ForecastEntry {
        ForecastEntry {
            timestamp: item.time,
            temperature: item.temperature,
            humidity: item.humidity.map(Humidity::from_reading),
            wind_speed: item.wind_speed,
        }
    }
}

#[async_trait]
impl WeatherPort for WeatherAdapter {
    #[instrument(skip(self), fields(city = %city, unit = %unit))]
    async fn get_current_conditions(
        &self,
        city: &CityName,
        unit: UnitSystem,
    ) -> Result<CurrentConditions, ApplicationError> {
        let result = self
            .client
            .get_current(city.as_str(), Self::map_units(unit))
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(current) => {
                debug!(
                    location = %current.location_name,
                    temperature = ?current.temperature,
                    "Retrieved current conditions"
                );
            },
            Err(e) => {
                debug!(error = %e, "Failed to get current conditions");
            },
        }

        result.map(Self::map_current)
    }

    #[instrument(skip(self), fields(city = %city, unit = %unit))]
    async fn get_forecast(
        &self,
        city: &CityName,
        unit: UnitSystem,
    ) -> Result<Vec<ForecastEntry>, ApplicationError> {
        let result = self
            .client
            .get_forecast(city.as_str(), Self::map_units(unit))
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(items) => {
                debug!(entries = items.len(), "Retrieved weather forecast");
            },
            Err(e) => {
                debug!(error = %e, "Failed to get weather forecast");
            },
        }

        result.map(|items| items.into_iter().map(Self::map_entry).collect())
    }
}
