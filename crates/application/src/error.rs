//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The requested resource does not exist upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// The upstream service answered with a non-success status
    #[error("Upstream error (HTTP {status}): {message}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Detail reported by the upstream service
        message: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The request did not complete in time
    #[error("Timed out: {0}")]
    Timeout(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// HTTP status code reported by the upstream service, if any
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::Upstream { status, .. } => Some(*status),
            Self::RateLimited => Some(429),
            Self::Domain(_)
            | Self::Timeout(_)
            | Self::ExternalService(_)
            | Self::Configuration(_) => None,
        }
    }
}
