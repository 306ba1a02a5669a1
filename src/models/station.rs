use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Result, StoreError};
use crate::utils::bounds::{validate_latitude, validate_longitude};

/// Identity of a station row, allocated by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationId(pub u64);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named geographic point identified by the key derived from its
/// name and coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Station {
    pub id: StationId,

    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// Compute the derived station key: name concatenated with both
/// coordinates truncated toward zero.
///
/// Truncation keeps the key stable under sub-degree jitter in repeated
/// coordinate entry for the same place. On negative coordinates it
/// truncates toward zero, not floor: -1.5 becomes "-1", never "-2".
///
/// # Examples
/// ```
/// use weather_store::models::station_key;
///
/// assert_eq!(station_key("Berlin", 52.5, 13.4), "Berlin5213");
/// assert_eq!(station_key("Ushuaia", -54.8, -68.3), "Ushuaia-54-68");
/// ```
pub fn station_key(name: &str, latitude: f64, longitude: f64) -> String {
    format!("{}{}{}", name, latitude as i64, longitude as i64)
}

impl Station {
    pub fn new(id: StationId, name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name,
            latitude,
            longitude,
        }
    }

    /// The derived key. Recomputed from the current fields on every call,
    /// never stored as settable state.
    pub fn key(&self) -> String {
        station_key(&self.name, self.latitude, self.longitude)
    }

    /// Reject rows with an empty name or out-of-range coordinates before
    /// they reach the registry.
    pub fn check_bounds(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        validate_latitude(self.latitude)?;
        validate_longitude(self.longitude)?;

        self.validate()?;

        Ok(())
    }
}
