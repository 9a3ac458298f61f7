//! Display state of a weather lookup session

use domain::UnitSystem;
use serde::Serialize;

use crate::{
    error::ApplicationError,
    ports::{CurrentConditions, ForecastEntry},
};

/// Message shown for every failed lookup
pub const CITY_NOT_FOUND: &str = "City not found";

/// Why the last lookup failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    /// User-facing message
    pub message: String,
    /// Upstream HTTP status, when the service answered
    pub status: Option<u16>,
    /// Underlying cause, for diagnostics
    pub cause: String,
}

impl FetchFailure {
    /// Build the failure reported for an application error
    #[must_use]
    pub fn from_error(error: &ApplicationError) -> Self {
        Self {
            message: CITY_NOT_FOUND.to_string(),
            status: error.status_code(),
            cause: error.to_string(),
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Everything a front end needs to render the current lookup
///
/// While `loading` is set, the data fields still hold the previous result.
/// `error` and `current` are never both present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FetchState {
    /// A lookup is in flight
    pub loading: bool,
    /// Failure of the last completed lookup
    pub error: Option<FetchFailure>,
    /// Current conditions of the last successful lookup
    pub current: Option<CurrentConditions>,
    /// Selected daily forecast of the last successful lookup
    pub daily: Vec<ForecastEntry>,
    /// Unit system the displayed data was fetched in
    pub unit: UnitSystem,
}

impl FetchState {
    /// Whether there is anything to show besides the loading indicator
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.current.is_some() || !self.daily.is_empty()
    }

    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub(crate) fn succeed(
        &mut self,
        current: CurrentConditions,
        daily: Vec<ForecastEntry>,
        unit: UnitSystem,
    ) {
        self.current = Some(current);
        self.daily = daily;
        self.error = None;
        self.unit = unit;
    }

    pub(crate) fn fail(&mut self, failure: FetchFailure) {
        self.current = None;
        self.daily.clear();
        self.error = Some(failure);
    }
}

/// Result of a single fetch invocation
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Both requests succeeded and the state now shows their data
    Completed,
    /// A request failed and the state now shows the failure
    Failed(FetchFailure),
    /// A newer fetch started meanwhile; this result was discarded
    Superseded,
}

impl FetchOutcome {
    /// Whether this fetch ended up on screen as a success
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}
