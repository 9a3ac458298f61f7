//! Weather service port
//!
//! Defines the interface for weather data retrieval by city name.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use domain::{CityName, Humidity, UnitSystem};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Current weather conditions
///
/// Readings are expressed in the unit system of the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Display name of the resolved location
    pub location_name: String,
    /// Temperature, if reported
    pub temperature: Option<f64>,
    /// Relative humidity, if reported
    pub humidity: Option<Humidity>,
    /// Wind speed, if reported
    pub wind_speed: Option<f64>,
}

/// One 3-hour forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Local date and time of the slot as reported by the feed
    pub timestamp: NaiveDateTime,
    /// Temperature, if reported
    pub temperature: Option<f64>,
    /// Relative humidity, if reported
    pub humidity: Option<Humidity>,
    /// Wind speed, if reported
    pub wind_speed: Option<f64>,
}

/// Port for weather service operations
#[allow(clippy::struct_field_names)] // automock generates struct with `get_*` prefixes
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Get current conditions for a city
    async fn get_current_conditions(
        &self,
        city: &CityName,
        unit: UnitSystem,
    ) -> Result<CurrentConditions, ApplicationError>;

    /// Get the raw forecast list for a city
    ///
    /// Entries are 3 hours apart and cover roughly five days.
    async fn get_forecast(
        &self,
        city: &CityName,
        unit: UnitSystem,
    ) -> Result<Vec<ForecastEntry>, ApplicationError>;
}
