//! Weather lookup service
//!
//! Owns the display state of a lookup session. A fetch requests current
//! conditions first and the forecast only after that succeeded, then publishes
//! the result through a `watch` channel.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use domain::{CityName, UnitSystem};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{CurrentConditions, ForecastEntry, WeatherPort},
    services::{
        fetch_state::{FetchFailure, FetchOutcome, FetchState},
        forecast_selector::{DEFAULT_MAX_DAYS, select_daily},
    },
};

/// City and unit system the session currently displays
#[derive(Debug, Clone)]
struct SessionQuery {
    city: CityName,
    unit: UnitSystem,
}

/// Clears `loading` when the newest fetch ends, including on cancellation
struct LoadingGuard<'a> {
    generation: &'a AtomicU64,
    state: &'a watch::Sender<FetchState>,
    ticket: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let ticket = self.ticket;
        let generation = self.generation;
        self.state.send_if_modified(|state| {
            if state.loading && generation.load(Ordering::SeqCst) == ticket {
                state.loading = false;
                true
            } else {
                false
            }
        });
    }
}

/// Fetch orchestrator for a single lookup session
pub struct WeatherLookupService {
    weather_port: Arc<dyn WeatherPort>,
    default_city: CityName,
    max_days: usize,
    query: Mutex<SessionQuery>,
    generation: AtomicU64,
    state: watch::Sender<FetchState>,
}

impl fmt::Debug for WeatherLookupService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherLookupService")
            .field("default_city", &self.default_city)
            .field("max_days", &self.max_days)
            .finish_non_exhaustive()
    }
}

impl WeatherLookupService {
    /// Create a new lookup service
    ///
    /// The session starts out on `default_city` in `unit`; nothing is fetched
    /// until [`initial_load`](Self::initial_load) or a search runs.
    pub fn new(weather_port: Arc<dyn WeatherPort>, default_city: CityName, unit: UnitSystem) -> Self {
        let (state, _) = watch::channel(FetchState {
            unit,
            ..FetchState::default()
        });
        Self {
            weather_port,
            query: Mutex::new(SessionQuery {
                city: default_city.clone(),
                unit,
            }),
            default_city,
            max_days: DEFAULT_MAX_DAYS,
            generation: AtomicU64::new(0),
            state,
        }
    }

    /// Limit the number of forecast days kept per lookup
    #[must_use]
    pub fn with_max_days(mut self, max_days: usize) -> Self {
        self.max_days = max_days;
        self
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Unit system used for the next fetch
    pub fn unit(&self) -> UnitSystem {
        self.query.lock().unit
    }

    /// City the session is showing or about to show
    pub fn city(&self) -> CityName {
        self.query.lock().city.clone()
    }

    /// Fetch the configured default city
    pub async fn initial_load(&self) -> FetchOutcome {
        let unit = self.remember(self.default_city.clone(), None);
        self.run(self.default_city.clone(), unit).await
    }

    /// Search for a city typed by the user, in the session's unit system
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the input is blank. Nothing is
    /// requested and the state is left untouched in that case.
    pub async fn search(&self, input: &str) -> Result<FetchOutcome, ApplicationError> {
        let unit = self.unit();
        self.fetch_weather(input, unit).await
    }

    /// Fetch current conditions and forecast for `city` in `unit`
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if `city` is blank. Network failures
    /// are not errors here; they end up in the state and in
    /// [`FetchOutcome::Failed`].
    #[instrument(skip(self))]
    pub async fn fetch_weather(
        &self,
        city: &str,
        unit: UnitSystem,
    ) -> Result<FetchOutcome, ApplicationError> {
        let city = CityName::new(city)?;
        self.remember(city.clone(), Some(unit));
        Ok(self.run(city, unit).await)
    }

    /// Switch the unit system and refetch the current city
    ///
    /// Returns `None` without fetching if `unit` is already active.
    pub async fn set_unit(&self, unit: UnitSystem) -> Option<FetchOutcome> {
        let city = {
            let mut query = self.query.lock();
            if query.unit == unit {
                return None;
            }
            query.unit = unit;
            query.city.clone()
        };
        debug!(unit = %unit, "Unit system changed");
        Some(self.run(city, unit).await)
    }

    /// Flip between metric and imperial and refetch the current city
    pub async fn toggle_unit(&self) -> FetchOutcome {
        let (city, unit) = {
            let mut query = self.query.lock();
            query.unit = query.unit.toggled();
            (query.city.clone(), query.unit)
        };
        debug!(unit = %unit, "Unit system toggled");
        self.run(city, unit).await
    }

    /// Record the query and return the unit it will be fetched in
    fn remember(&self, city: CityName, unit: Option<UnitSystem>) -> UnitSystem {
        let mut query = self.query.lock();
        query.city = city;
        if let Some(unit) = unit {
            query.unit = unit;
        }
        query.unit
    }

    #[instrument(skip(self))]
    async fn run(&self, city: CityName, unit: UnitSystem) -> FetchOutcome {
        // Ticket and `begin` share the watch lock so a stale `begin` cannot
        // land after a newer fetch has completed.
        let mut ticket = 0;
        self.state.send_modify(|state| {
            ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.begin();
        });
        let _guard = LoadingGuard {
            generation: &self.generation,
            state: &self.state,
            ticket,
        };

        let result = self.fetch_both(&city, unit).await;

        let mut outcome = FetchOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != ticket {
                return false;
            }
            match result {
                Ok((current, daily)) => {
                    info!(
                        location = %current.location_name,
                        days = daily.len(),
                        "Weather lookup completed"
                    );
                    state.succeed(current, daily, unit);
                    outcome = FetchOutcome::Completed;
                },
                Err(ref e) => {
                    warn!(error = %e, status = ?e.status_code(), "Weather lookup failed");
                    let failure = FetchFailure::from_error(e);
                    state.fail(failure.clone());
                    outcome = FetchOutcome::Failed(failure);
                },
            }
            state.loading = false;
            true
        });

        if outcome == FetchOutcome::Superseded {
            debug!(ticket, "Discarding superseded lookup result");
        }
        outcome
    }

    async fn fetch_both(
        &self,
        city: &CityName,
        unit: UnitSystem,
    ) -> Result<(CurrentConditions, Vec<ForecastEntry>), ApplicationError> {
        let current = self.weather_port.get_current_conditions(city, unit).await?;
        let forecast = self.weather_port.get_forecast(city, unit).await?;
        debug!(entries = forecast.len(), "Forecast received");
        Ok((current, select_daily(&forecast, self.max_days)))
    }
}
