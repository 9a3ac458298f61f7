//! Application layer - Use cases and orchestration
//!
//! Contains the weather lookup orchestration, forecast selection and display
//! formatting, plus the port the infrastructure layer implements.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
