//! Domain layer for the weather lookup
//!
//! Contains the value objects shared by every other layer and the domain
//! errors raised when user input does not satisfy them.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
