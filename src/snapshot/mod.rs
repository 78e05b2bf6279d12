//! Persisted item snapshots and the differencer that compares them.

pub mod diff;
pub mod store;

pub use diff::{compare_snapshots, SnapshotDiff, StatusChange};
pub use store::{snapshot_file_name, Snapshot, SnapshotStore};
