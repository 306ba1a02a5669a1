/// Coordinate bounds
pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Temperature bounds
pub const MIN_VALID_TEMP: f64 = -100.0;
pub const MAX_VALID_TEMP: f64 = 70.0;
