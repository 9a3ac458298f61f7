//! Weather display formatting
//!
//! Pure functions turning readings and fetch state into terminal text.
//! Missing readings render as "N/A"; a reading of zero is still a reading.

use chrono::NaiveDateTime;
use domain::{Humidity, UnitSystem};

use crate::{
    ports::{CurrentConditions, ForecastEntry},
    services::fetch_state::FetchState,
};

/// Placeholder for a missing reading
pub const NOT_AVAILABLE: &str = "N/A";

/// Line shown while a lookup is in flight
pub const LOADING_LINE: &str = "Loading...";

/// Format a temperature, e.g. "21.5°C"
#[must_use]
pub fn format_temperature(value: Option<f64>, unit: UnitSystem) -> String {
    value.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |v| format!("{v}{}", unit.temperature_suffix()),
    )
}

/// Format a wind speed, e.g. "3.4 m/s"
#[must_use]
pub fn format_wind_speed(value: Option<f64>, unit: UnitSystem) -> String {
    value.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |v| format!("{v} {}", unit.wind_speed_suffix()),
    )
}

/// Format a humidity, e.g. "65%"
#[must_use]
pub fn format_humidity(value: Option<Humidity>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |h| h.to_string())
}

/// Long English weekday name, e.g. "Monday"
#[must_use]
pub fn format_weekday(timestamp: NaiveDateTime) -> String {
    timestamp.format("%A").to_string()
}

/// Current conditions block
#[must_use]
pub fn format_current_conditions(current: &CurrentConditions, unit: UnitSystem) -> String {
    [
        current.location_name.clone(),
        format_temperature(current.temperature, unit),
        format!("Humidity: {}", format_humidity(current.humidity)),
        format!("Wind Speed: {}", format_wind_speed(current.wind_speed, unit)),
    ]
    .join("\n")
}

/// One forecast card, titled with the weekday
#[must_use]
pub fn format_forecast_card(entry: &ForecastEntry, unit: UnitSystem) -> String {
    [
        format_weekday(entry.timestamp),
        format_temperature(entry.temperature, unit),
        format!("Humidity: {}", format_humidity(entry.humidity)),
        format!("Wind: {}", format_wind_speed(entry.wind_speed, unit)),
    ]
    .join("\n")
}

/// Render the whole lookup view
///
/// Order: loading line, error line, current conditions (hidden while
/// loading), then the forecast section when there is a selection.
#[must_use]
pub fn format_fetch_state(state: &FetchState) -> String {
    let mut sections = Vec::new();

    if state.loading {
        sections.push(LOADING_LINE.to_string());
    }

    if let Some(ref error) = state.error {
        sections.push(format!("Error: {error}"));
    }

    if let Some(current) = state.current.as_ref().filter(|_| !state.loading) {
        sections.push(format_current_conditions(current, state.unit));
    }

    if !state.daily.is_empty() {
        let header = format!(
            "{}-Day Forecast ({})",
            state.daily.len(),
            state.unit.label()
        );
        let cards: Vec<String> = state
            .daily
            .iter()
            .map(|entry| format_forecast_card(entry, state.unit))
            .collect();
        sections.push(format!("{header}\n\n{}", cards.join("\n\n")));
    }

    sections.join("\n\n")
}
