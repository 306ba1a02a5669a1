pub mod snapshot_writer;

pub use snapshot_writer::{Snapshot, SnapshotWriter};
