pub mod bounds;
pub mod constants;

pub use bounds::{validate_latitude, validate_longitude, validate_temperature};
pub use constants::*;
