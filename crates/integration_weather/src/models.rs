//! Weather data models
//!
//! Wire types for the OpenWeatherMap responses and the parsed types handed to
//! callers. Every reading is optional: the feed omits fields it has no data for.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Unit system requested from the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Celsius and metres per second
    #[default]
    Metric,
    /// Fahrenheit and miles per hour
    Imperial,
}

impl Units {
    /// Value of the `units` query parameter
    #[must_use]
    pub const fn as_query(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

/// Current conditions for a resolved location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Display name of the location the API resolved the query to
    pub location_name: String,
    /// Temperature in the requested units
    pub temperature: Option<f64>,
    /// Relative humidity percentage as reported
    pub humidity: Option<f64>,
    /// Wind speed in the requested units
    pub wind_speed: Option<f64>,
}

/// One 3-hour forecast slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastItem {
    /// Slot timestamp as printed by the feed (`dt_txt`)
    pub time: NaiveDateTime,
    /// Temperature in the requested units
    pub temperature: Option<f64>,
    /// Relative humidity percentage as reported
    pub humidity: Option<f64>,
    /// Wind speed in the requested units
    pub wind_speed: Option<f64>,
}

// ==============================
// API wire format
// ==============================

/// `main` block shared by both endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct MainData {
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
}

/// `wind` block shared by both endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct WindData {
    pub speed: Option<f64>,
}

/// Response of `GET /weather`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CurrentResponse {
    pub name: Option<String>,
    pub main: Option<MainData>,
    pub wind: Option<WindData>,
}

/// Response of `GET /forecast`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastData>,
}

/// Single entry of the forecast `list`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForecastData {
    pub dt_txt: String,
    pub main: Option<MainData>,
    pub wind: Option<WindData>,
}

/// Error body returned alongside non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorResponse {
    pub message: Option<String>,
}
