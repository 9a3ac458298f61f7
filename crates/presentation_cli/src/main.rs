//! Weather lookup CLI
//!
//! Looks up current conditions and a daily forecast by city name, either once
//! (`lookup`) or in an interactive session.

#![allow(clippy::print_stdout)]

mod interactive;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use application::{FetchOutcome, WeatherLookupService, format_fetch_state};
use clap::{Parser, Subcommand};
use domain::UnitSystem;
use infrastructure::{AppConfig, WeatherAdapter, init_logging};
use tracing::{debug, info};

/// Weather lookup CLI
#[derive(Parser)]
#[command(name = "weather-cli")]
#[command(author, version, about = "Current weather and forecast by city name", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHERMAP_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one city and print the result
    ///
    /// Exits with a non-zero status if the lookup fails.
    /// Example: weather-cli lookup "New York" --units imperial
    Lookup {
        /// City name (default: lookup.default_city from the configuration)
        city: Option<String>,

        /// Unit system: metric or imperial
        #[arg(short, long)]
        units: Option<UnitSystem>,

        /// Number of forecast days (1-5)
        #[arg(short, long)]
        days: Option<usize>,
    },

    /// Start an interactive session
    ///
    /// Loads the default city, then reads city names from stdin.
    /// `:units` switches between Celsius and Fahrenheit, `:quit` exits.
    Interactive {
        /// Unit system to start in: metric or imperial
        #[arg(short, long)]
        units: Option<UnitSystem>,
    },
}

/// Determine log filter override from verbosity count
///
/// Without `-v` the configured filter applies.
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

fn build_service(config: &AppConfig, unit: UnitSystem) -> anyhow::Result<WeatherLookupService> {
    let adapter = WeatherAdapter::with_config(config.weather.to_weather_config())?;
    let default_city = config.lookup.default_city()?;
    Ok(
        WeatherLookupService::new(Arc::new(adapter), default_city, unit)
            .with_max_days(config.lookup.forecast_days),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(key) = cli.api_key {
        config.set_api_key(key);
    }

    init_logging(&config.logging, log_filter_from_verbosity(cli.verbose))?;

    match cli.command {
        Commands::Lookup { city, units, days } => {
            if let Some(days) = days {
                config.lookup.forecast_days = days;
            }
            config.validate().context("invalid configuration")?;

            let unit = units.unwrap_or(config.lookup.default_units);
            let service = build_service(&config, unit)?;
            debug!(?city, %unit, "Running one-shot lookup");

            let outcome = match city {
                Some(city) => service.search(&city).await?,
                None => service.initial_load().await,
            };

            println!("{}", format_fetch_state(&service.snapshot()));

            if let FetchOutcome::Failed(failure) = outcome {
                anyhow::bail!("lookup failed: {}", failure.cause);
            }
        },

        Commands::Interactive { units } => {
            config.validate().context("invalid configuration")?;

            let unit = units.unwrap_or(config.lookup.default_units);
            let service = build_service(&config, unit)?;
            info!(city = %service.city(), %unit, "Starting interactive session");

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            interactive::run(&service, stdin, &mut std::io::stdout()).await?;
        },
    }

    Ok(())
}
