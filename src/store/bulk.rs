use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::warn;

use crate::error::{Result, StoreError};
use crate::models::{ObservationTime, StationId};
use crate::store::WeatherStore;

/// Input row for bulk station seeding.
#[derive(Debug, Clone)]
pub struct StationSeed {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl StationSeed {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

/// Input row for bulk reading ingest.
#[derive(Debug, Clone)]
pub struct ReadingInput {
    pub station: StationId,
    pub temperature: f64,
    pub time: ObservationTime,
}

impl ReadingInput {
    pub fn new(station: StationId, temperature: f64, time: impl Into<ObservationTime>) -> Self {
        Self {
            station,
            temperature,
            time: time.into(),
        }
    }
}

/// Outcome counters for one bulk operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub inserted: usize,
    /// Rows whose derived key or station/time slot was already taken.
    pub duplicates: usize,
    /// Rows rejected by bound checks or naming an unknown station.
    pub rejected: usize,
}

impl IngestReport {
    pub fn total(&self) -> usize {
        self.inserted + self.duplicates + self.rejected
    }
}

/// Parallel loader over a shared store.
///
/// Rows that collide with existing data count as duplicates instead of
/// failing the batch; feeds routinely resend observations that are
/// already present.
pub struct BulkLoader {
    max_workers: usize,
}

impl BulkLoader {
    pub fn new(max_workers: usize) -> Self {
        Self { max_workers }
    }

    /// Register every seed station, tolerating ones already present.
    pub fn seed_stations(
        &self,
        store: &WeatherStore,
        seeds: &[StationSeed],
    ) -> Result<IngestReport> {
        self.run(seeds, |seed| {
            store
                .create_station(&seed.name, seed.latitude, seed.longitude)
                .map(|_| ())
        })
    }

    /// Insert every reading, tolerating occupied (station, time) slots.
    pub fn ingest_readings(
        &self,
        store: &WeatherStore,
        inputs: &[ReadingInput],
    ) -> Result<IngestReport> {
        self.run(inputs, |input| {
            store
                .add_reading(input.station, input.temperature, input.time.clone())
                .map(|_| ())
        })
    }

    fn run<T, F>(&self, rows: &[T], op: F) -> Result<IngestReport>
    where
        T: Sync,
        F: Fn(&T) -> Result<()> + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| StoreError::WorkerPool(e.to_string()))?;

        let inserted = AtomicUsize::new(0);
        let duplicates = AtomicUsize::new(0);
        let rejected = AtomicUsize::new(0);

        pool.install(|| {
            rows.par_iter().for_each(|row| match op(row) {
                Ok(()) => {
                    inserted.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) if e.is_conflict() => {
                    duplicates.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    warn!(error = %e, "row rejected during bulk load");
                    rejected.fetch_add(1, Ordering::Relaxed);
                }
            });
        });

        Ok(IngestReport {
            inserted: inserted.into_inner(),
            duplicates: duplicates.into_inner(),
            rejected: rejected.into_inner(),
        })
    }
}

impl Default for BulkLoader {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
