//! Status reports for GitHub Projects boards: fetch the items through the
//! `gh` CLI, compute progress metrics, keep timestamped snapshots and render
//! HTML, Markdown, CSV, JSON or terminal reports.

pub mod charts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod fetch;
pub mod formatting;
pub mod io;
pub mod metrics;
pub mod snapshot;

pub use crate::core::{Error, Item, Priority, Result, Status};
pub use crate::metrics::{calculate_metrics, ProjectMetrics};
pub use crate::snapshot::{compare_snapshots, SnapshotDiff, SnapshotStore};
