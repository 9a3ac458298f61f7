//! Value Objects - Immutable, identity-less domain primitives

mod city_name;
mod humidity;
mod unit_system;

pub use city_name::CityName;
pub use humidity::{Humidity, InvalidHumidity};
pub use unit_system::UnitSystem;
