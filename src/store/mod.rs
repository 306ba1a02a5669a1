pub mod bulk;
mod ledger;
mod registry;

pub use bulk::{BulkLoader, IngestReport, ReadingInput, StationSeed};
pub use registry::StationUpdate;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{Result, StoreError};
use crate::models::{ObservationTime, Reading, ReadingId, Station, StationId};
use crate::writers::Snapshot;
use ledger::ReadingLedger;
use registry::StationRegistry;

#[derive(Debug, Default)]
struct State {
    stations: StationRegistry,
    readings: ReadingLedger,
}

/// Thread-safe weather observation store.
///
/// One lock spans the station registry and the reading ledger, so every
/// uniqueness check commits in the same critical section that verified it,
/// and deleting a station and cascading its readings is a single
/// indivisible unit. Reads run concurrently with each other.
#[derive(Debug, Default)]
pub struct WeatherStore {
    state: RwLock<State>,
}

impl WeatherStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        // Mutations validate fully before touching state, so a guard
        // recovered from a poisoned lock is still coherent.
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a station, enforcing coordinate bounds and uniqueness of
    /// the derived key.
    pub fn create_station(&self, name: &str, latitude: f64, longitude: f64) -> Result<StationId> {
        let mut state = self.write();
        let id = state.stations.insert(name, latitude, longitude)?;
        debug!(%id, name, "station created");
        Ok(id)
    }

    /// Apply a partial update, re-running bound checks on changed fields
    /// and re-checking key uniqueness against the recomputed key.
    pub fn update_station(&self, id: StationId, update: StationUpdate) -> Result<()> {
        let mut state = self.write();
        state.stations.update(id, update)?;
        debug!(%id, "station updated");
        Ok(())
    }

    /// Delete a station and every reading it owns.
    ///
    /// The cascade runs in the same critical section as the removal, so no
    /// reader ever observes a reading whose station is gone.
    pub fn delete_station(&self, id: StationId) -> Result<()> {
        let mut state = self.write();
        state.stations.remove(id)?;
        let cascaded = state.readings.cascade_delete(id);
        debug!(%id, cascaded, "station deleted");
        Ok(())
    }

    pub fn get_station(&self, id: StationId) -> Option<Station> {
        self.read().stations.get(id).cloned()
    }

    /// Look a station up by its derived key.
    pub fn get_by_key(&self, key: &str) -> Option<Station> {
        self.read().stations.get_by_key(key).cloned()
    }

    /// All station names in ascending order.
    pub fn station_names(&self) -> Vec<String> {
        self.read().stations.names()
    }

    pub fn station_count(&self) -> usize {
        self.read().stations.len()
    }

    /// Record an observation for an existing station.
    ///
    /// The station lookup, the (station, time) exclusivity check and the
    /// insert all happen under one write lock; two racing writers for the
    /// same slot cannot both succeed.
    pub fn add_reading(
        &self,
        station: StationId,
        temperature: f64,
        time: impl Into<ObservationTime>,
    ) -> Result<ReadingId> {
        let time = time.into();
        let mut state = self.write();

        if !state.stations.contains(station) {
            return Err(StoreError::StationNotFound(station));
        }

        let id = state.readings.insert(station, temperature, time)?;
        debug!(%id, %station, "reading added");
        Ok(id)
    }

    pub fn remove_reading(&self, id: ReadingId) -> Result<()> {
        let mut state = self.write();
        state.readings.remove(id)?;
        debug!(%id, "reading removed");
        Ok(())
    }

    /// All readings for a station in ascending time order.
    ///
    /// Unknown stations and stations without readings both produce an empty
    /// vector; this query answers "which rows", not "does the station exist".
    pub fn readings_for_station(&self, station: StationId) -> Vec<Reading> {
        self.read().readings.for_station(station)
    }

    /// The most recent reading for a station, if any.
    pub fn latest_reading(&self, station: StationId) -> Option<Reading> {
        self.read().readings.latest(station)
    }

    pub fn reading_count(&self) -> usize {
        self.read().readings.len()
    }

    /// A consistent image of the whole store, rows ordered by id.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.read();

        let mut stations: Vec<Station> = state.stations.iter().cloned().collect();
        stations.sort_by_key(|s| s.id);

        let mut readings: Vec<Reading> = state.readings.iter().cloned().collect();
        readings.sort_by_key(|r| r.id);

        Snapshot { stations, readings }
    }

    /// Rebuild a store from a snapshot, replaying every row through the
    /// same bound, uniqueness and referential checks as live inserts.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let store = Self::new();

        {
            let mut state = store.write();

            for station in snapshot.stations {
                state.stations.restore(station)?;
            }

            for reading in snapshot.readings {
                if !state.stations.contains(reading.station) {
                    return Err(StoreError::DanglingReading {
                        reading: reading.id,
                        station: reading.station,
                    });
                }
                state.readings.restore(reading)?;
            }
        }

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get_by_key() {
        let store = WeatherStore::new();
        let id = store.create_station("Berlin", 52.5, 13.4).unwrap();

        let station = store.get_by_key("Berlin5213").unwrap();
        assert_eq!(station.id, id);

        assert!(store.get_by_key("Berlin0000").is_none());
    }

    #[test]
    fn test_duplicate_station_rejected() {
        let store = WeatherStore::new();
        store.create_station("Berlin", 52.5, 13.4).unwrap();

        let err = store.create_station("Berlin", 52.5, 13.4).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_add_reading_requires_station() {
        let store = WeatherStore::new();

        let err = store.add_reading(StationId(99), 20.0, "t1").unwrap_err();
        assert!(matches!(err, StoreError::StationNotFound(StationId(99))));
    }

    #[test]
    fn test_reading_time_exclusive_per_station() {
        let store = WeatherStore::new();
        let id = store.create_station("Berlin", 52.5, 13.4).unwrap();

        store.add_reading(id, 20.0, "t1").unwrap();
        let err = store.add_reading(id, 25.0, "t1").unwrap_err();

        assert!(matches!(
            err,
            StoreError::DuplicateReading { station, .. } if station == id
        ));
        assert_eq!(store.reading_count(), 1);
    }

    #[test]
    fn test_readings_come_back_time_ordered() {
        let store = WeatherStore::new();
        let id = store.create_station("Berlin", 52.5, 13.4).unwrap();

        store.add_reading(id, 10.0, "t3").unwrap();
        store.add_reading(id, 11.0, "t1").unwrap();
        store.add_reading(id, 12.0, "t2").unwrap();

        let times: Vec<String> = store
            .readings_for_station(id)
            .iter()
            .map(|r| r.time.to_string())
            .collect();
        assert_eq!(times, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn test_delete_station_cascades() {
        let store = WeatherStore::new();
        let doomed = store.create_station("Berlin", 52.5, 13.4).unwrap();
        let spared = store.create_station("Munich", 48.1, 11.6).unwrap();

        store.add_reading(doomed, 10.0, "t1").unwrap();
        store.add_reading(doomed, 11.0, "t2").unwrap();
        store.add_reading(doomed, 12.0, "t3").unwrap();
        store.add_reading(spared, 13.0, "t1").unwrap();

        store.delete_station(doomed).unwrap();

        assert!(store.readings_for_station(doomed).is_empty());
        assert_eq!(store.readings_for_station(spared).len(), 1);
        assert_eq!(store.reading_count(), 1);
        assert!(store.get_by_key("Berlin5213").is_none());
    }

    #[test]
    fn test_delete_unknown_station() {
        let store = WeatherStore::new();
        assert!(store.delete_station(StationId(1)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_station_recomputes_key() {
        let store = WeatherStore::new();
        let id = store.create_station("Berlin", 52.5, 13.4).unwrap();

        store
            .update_station(id, StationUpdate::new().name("Potsdam"))
            .unwrap();

        assert!(store.get_by_key("Berlin5213").is_none());
        assert_eq!(store.get_by_key("Potsdam5213").unwrap().id, id);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let store = WeatherStore::new();
        let id = store.create_station("Berlin", 52.5, 13.4).unwrap();
        store.add_reading(id, 10.0, "t2").unwrap();
        store.add_reading(id, 11.0, "t1").unwrap();

        let rebuilt = WeatherStore::from_snapshot(store.snapshot()).unwrap();

        assert_eq!(rebuilt.station_count(), 1);
        assert_eq!(rebuilt.reading_count(), 2);
        assert_eq!(rebuilt.get_by_key("Berlin5213").unwrap().id, id);

        let times: Vec<String> = rebuilt
            .readings_for_station(id)
            .iter()
            .map(|r| r.time.to_string())
            .collect();
        assert_eq!(times, vec!["t1", "t2"]);

        // Id allocation resumes past the loaded rows.
        let next = rebuilt.create_station("Munich", 48.1, 11.6).unwrap();
        assert!(next > id);
    }

    #[test]
    fn test_from_snapshot_rejects_dangling_reading() {
        let store = WeatherStore::new();
        let id = store.create_station("Berlin", 52.5, 13.4).unwrap();
        store.add_reading(id, 10.0, "t1").unwrap();

        let mut snapshot = store.snapshot();
        snapshot.stations.clear();

        let err = WeatherStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, StoreError::DanglingReading { .. }));
    }
}
