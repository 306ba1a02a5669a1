use thiserror::Error;

use crate::models::{ObservationTime, ReadingId, StationId};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{field} {value} is outside valid range [{min}, {max}]")]
    RangeViolation {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("station name must not be empty")]
    EmptyName,

    #[error("station key '{key}' is already in use")]
    DuplicateKey { key: String },

    #[error("station {station} already has a reading at {time}")]
    DuplicateReading {
        station: StationId,
        time: ObservationTime,
    },

    #[error("station {0} not found")]
    StationNotFound(StationId),

    #[error("reading {0} not found")]
    ReadingNotFound(ReadingId),

    #[error("reading {reading} references unknown station {station}")]
    DanglingReading {
        reading: ReadingId,
        station: StationId,
    },

    #[error("invalid snapshot data: {0}")]
    InvalidSnapshot(String),

    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("worker pool error: {0}")]
    WorkerPool(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// True for uniqueness-constraint collisions (derived key or composite
    /// station/time key). Callers ingesting data that may already be present
    /// branch on this rather than matching variants.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::DuplicateKey { .. } | StoreError::DuplicateReading { .. }
        )
    }

    /// True when a referenced station or reading identity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::StationNotFound(_) | StoreError::ReadingNotFound(_)
        )
    }
}
