//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// City input was empty or contained only whitespace
    #[error("Please enter a valid city name!")]
    EmptyCityName,

    /// Unit system name not recognised
    #[error("Invalid unit system: {0}. Use 'metric' or 'imperial'")]
    InvalidUnitSystem(String),
}
