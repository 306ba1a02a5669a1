use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Reading, Station};
use crate::store::WeatherStore;

/// Serializable image of the full store: every station row and every
/// reading row, ordered by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub stations: Vec<Station>,
    pub readings: Vec<Reading>,
}

/// Writes store snapshots to JSON files and loads them back.
pub struct SnapshotWriter {
    pretty: bool,
}

impl SnapshotWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn with_pretty(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Write the store's current contents to `path`.
    pub fn write_snapshot(&self, store: &WeatherStore, path: &Path) -> Result<()> {
        let snapshot = store.snapshot();
        let writer = BufWriter::new(File::create(path)?);

        if self.pretty {
            serde_json::to_writer_pretty(writer, &snapshot)?;
        } else {
            serde_json::to_writer(writer, &snapshot)?;
        }

        Ok(())
    }

    /// Load a snapshot file into a fresh store.
    ///
    /// Every row passes through the same bound, uniqueness and referential
    /// checks as a live insert; a file violating any of them is rejected
    /// whole.
    pub fn read_snapshot(&self, path: &Path) -> Result<WeatherStore> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Snapshot = serde_json::from_reader(reader)?;

        WeatherStore::from_snapshot(snapshot)
    }
}

impl Default for SnapshotWriter {
    fn default() -> Self {
        Self::new()
    }
}
