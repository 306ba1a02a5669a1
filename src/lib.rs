pub mod error;
pub mod models;
pub mod store;
pub mod utils;
pub mod writers;

pub use error::{Result, StoreError};
pub use store::WeatherStore;
