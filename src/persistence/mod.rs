//! Persistence layer: whole-collection JSON snapshots.

pub mod serialization;
pub mod snapshot;

pub use snapshot::SnapshotFile;
