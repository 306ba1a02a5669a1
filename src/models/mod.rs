pub mod reading;
pub mod station;

pub use reading::{ObservationTime, Reading, ReadingId};
pub use station::{station_key, Station, StationId};
