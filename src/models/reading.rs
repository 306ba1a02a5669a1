use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::models::StationId;
use crate::utils::bounds::validate_temperature;

/// Identity of a reading row, allocated by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReadingId(pub u64);

impl fmt::Display for ReadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque timestamp token attached to a reading.
///
/// The token is string-encoded and only ever compared and ordered; its
/// format belongs to whatever produced it. Lexicographic order over the
/// token is the observation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObservationTime(String);

impl ObservationTime {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObservationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObservationTime {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for ObservationTime {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// A single temperature observation at one station and one time.
///
/// A reading always belongs to exactly one station and never outlives it;
/// the ledger removes all of a station's readings when the station goes.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Reading {
    pub id: ReadingId,

    pub station: StationId,

    #[validate(range(min = -100.0, max = 70.0))]
    pub temperature: f64,

    pub time: ObservationTime,
}

impl Reading {
    pub fn new(
        id: ReadingId,
        station: StationId,
        temperature: f64,
        time: ObservationTime,
    ) -> Self {
        Self {
            id,
            station,
            temperature,
            time,
        }
    }

    pub fn check_bounds(&self) -> Result<()> {
        validate_temperature(self.temperature)?;

        self.validate()?;

        Ok(())
    }
}
