use std::collections::HashMap;

use crate::error::{Result, StoreError};
use crate::models::{Station, StationId};

/// Partial update of a station's fields. Unset fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct StationUpdate {
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl StationUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn latitude(mut self, latitude: f64) -> Self {
        self.latitude = Some(latitude);
        self
    }

    pub fn longitude(mut self, longitude: f64) -> Self {
        self.longitude = Some(longitude);
        self
    }
}

/// Station rows plus the write-through index over the derived key.
///
/// The registry is a plain data structure; callers serialize access to it.
/// Every mutating method validates fully before touching either map, so a
/// returned error means nothing changed.
#[derive(Debug, Default)]
pub(crate) struct StationRegistry {
    rows: HashMap<StationId, Station>,
    by_key: HashMap<String, StationId>,
    next_id: u64,
}

impl StationRegistry {
    pub(crate) fn insert(&mut self, name: &str, latitude: f64, longitude: f64) -> Result<StationId> {
        let id = StationId(self.next_id + 1);
        let station = Station::new(id, name.to_string(), latitude, longitude);
        station.check_bounds()?;

        let key = station.key();
        if self.by_key.contains_key(&key) {
            return Err(StoreError::DuplicateKey { key });
        }

        self.next_id += 1;
        self.by_key.insert(key, id);
        self.rows.insert(id, station);

        Ok(id)
    }

    pub(crate) fn update(&mut self, id: StationId, update: StationUpdate) -> Result<()> {
        let current = self.rows.get(&id).ok_or(StoreError::StationNotFound(id))?;

        let mut updated = current.clone();
        if let Some(name) = update.name {
            updated.name = name;
        }
        if let Some(latitude) = update.latitude {
            updated.latitude = latitude;
        }
        if let Some(longitude) = update.longitude {
            updated.longitude = longitude;
        }
        updated.check_bounds()?;

        let old_key = current.key();
        let new_key = updated.key();

        // Recomputing onto its own key is a no-op collision and allowed.
        if let Some(&holder) = self.by_key.get(&new_key) {
            if holder != id {
                return Err(StoreError::DuplicateKey { key: new_key });
            }
        }

        self.by_key.remove(&old_key);
        self.by_key.insert(new_key, id);
        self.rows.insert(id, updated);

        Ok(())
    }

    pub(crate) fn remove(&mut self, id: StationId) -> Result<Station> {
        let station = self
            .rows
            .remove(&id)
            .ok_or(StoreError::StationNotFound(id))?;
        self.by_key.remove(&station.key());

        Ok(station)
    }

    pub(crate) fn get(&self, id: StationId) -> Option<&Station> {
        self.rows.get(&id)
    }

    pub(crate) fn get_by_key(&self, key: &str) -> Option<&Station> {
        self.by_key.get(key).and_then(|id| self.rows.get(id))
    }

    pub(crate) fn contains(&self, id: StationId) -> bool {
        self.rows.contains_key(&id)
    }

    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rows.values().map(|s| s.name.clone()).collect();
        names.sort();
        names
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Station> {
        self.rows.values()
    }

    /// Re-admit a station preserving its id, used when loading a snapshot.
    pub(crate) fn restore(&mut self, station: Station) -> Result<()> {
        station.check_bounds()?;

        if self.rows.contains_key(&station.id) {
            return Err(StoreError::InvalidSnapshot(format!(
                "duplicate station id {}",
                station.id
            )));
        }

        let key = station.key();
        if self.by_key.contains_key(&key) {
            return Err(StoreError::DuplicateKey { key });
        }

        self.next_id = self.next_id.max(station.id.0);
        self.by_key.insert(key, station.id);
        self.rows.insert(station.id, station);

        Ok(())
    }
}
