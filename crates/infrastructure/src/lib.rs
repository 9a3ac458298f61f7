//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer and provides
//! configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, ConfigValidationError, LogFormat, LoggingConfig, LookupConfig, WeatherAppConfig,
};
pub use telemetry::{TelemetryError, init_logging};
