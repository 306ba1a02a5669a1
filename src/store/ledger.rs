use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, StoreError};
use crate::models::{ObservationTime, Reading, ReadingId, StationId};

/// Reading rows plus the per-station index ordered by observation time.
///
/// The ordered index serves two constraints at once: the contains-check on
/// insert enforces one reading per (station, time), and in-order iteration
/// materializes the ascending time view without sorting on read.
#[derive(Debug, Default)]
pub(crate) struct ReadingLedger {
    rows: HashMap<ReadingId, Reading>,
    by_station: HashMap<StationId, BTreeMap<ObservationTime, ReadingId>>,
    next_id: u64,
}

impl ReadingLedger {
    /// The caller has already established that `station` exists.
    pub(crate) fn insert(
        &mut self,
        station: StationId,
        temperature: f64,
        time: ObservationTime,
    ) -> Result<ReadingId> {
        let id = ReadingId(self.next_id + 1);
        let reading = Reading::new(id, station, temperature, time);
        reading.check_bounds()?;

        if let Some(slots) = self.by_station.get(&station) {
            if slots.contains_key(&reading.time) {
                return Err(StoreError::DuplicateReading {
                    station,
                    time: reading.time,
                });
            }
        }

        self.next_id += 1;
        self.by_station
            .entry(station)
            .or_default()
            .insert(reading.time.clone(), id);
        self.rows.insert(id, reading);

        Ok(id)
    }

    pub(crate) fn remove(&mut self, id: ReadingId) -> Result<Reading> {
        let reading = self
            .rows
            .remove(&id)
            .ok_or(StoreError::ReadingNotFound(id))?;

        if let Some(slots) = self.by_station.get_mut(&reading.station) {
            slots.remove(&reading.time);
            if slots.is_empty() {
                self.by_station.remove(&reading.station);
            }
        }

        Ok(reading)
    }

    /// Drop every reading owned by `station`, returning how many went.
    /// A station with no readings is not an error.
    pub(crate) fn cascade_delete(&mut self, station: StationId) -> usize {
        let Some(slots) = self.by_station.remove(&station) else {
            return 0;
        };

        let removed = slots.len();
        for id in slots.into_values() {
            self.rows.remove(&id);
        }

        removed
    }

    /// All readings for `station` in ascending time order. Empty when the
    /// station has no rows or is unknown.
    pub(crate) fn for_station(&self, station: StationId) -> Vec<Reading> {
        self.by_station
            .get(&station)
            .map(|slots| {
                slots
                    .values()
                    .filter_map(|id| self.rows.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The most recent reading for `station`.
    pub(crate) fn latest(&self, station: StationId) -> Option<Reading> {
        self.by_station
            .get(&station)
            .and_then(|slots| slots.values().next_back())
            .and_then(|id| self.rows.get(id))
            .cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.rows.values()
    }

    /// Re-admit a reading preserving its id, used when loading a snapshot.
    pub(crate) fn restore(&mut self, reading: Reading) -> Result<()> {
        reading.check_bounds()?;

        if self.rows.contains_key(&reading.id) {
            return Err(StoreError::InvalidSnapshot(format!(
                "duplicate reading id {}",
                reading.id
            )));
        }

        if let Some(slots) = self.by_station.get(&reading.station) {
            if slots.contains_key(&reading.time) {
                return Err(StoreError::DuplicateReading {
                    station: reading.station,
                    time: reading.time,
                });
            }
        }

        self.next_id = self.next_id.max(reading.id.0);
        self.by_station
            .entry(reading.station)
            .or_default()
            .insert(reading.time.clone(), reading.id);
        self.rows.insert(reading.id, reading);

        Ok(())
    }
}
