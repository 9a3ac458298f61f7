//! Application services - Use case implementations

mod fetch_state;
pub mod forecast_selector;
mod weather_formatter;
mod weather_lookup_service;

pub use fetch_state::{CITY_NOT_FOUND, FetchFailure, FetchOutcome, FetchState};
pub use forecast_selector::{DEFAULT_MAX_DAYS, select_daily};
pub use weather_formatter::{
    LOADING_LINE, NOT_AVAILABLE, format_current_conditions, format_fetch_state,
    format_forecast_card, format_humidity, format_temperature, format_weekday, format_wind_speed,
};
pub use weather_lookup_service::WeatherLookupService;
