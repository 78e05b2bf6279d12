//! CLI command implementations.
//!
//! - **report**: fetch the project, snapshot it and render a report
//! - **diff**: compare two stored snapshots
//! - **init**: write a default configuration file

pub mod diff;
pub mod init;
pub mod report;

pub use diff::{handle_diff, DiffConfig, DiffTarget};
pub use init::{init_config, init_config_at};
pub use report::{generate_report, handle_report, resolve_config, ReportOptions, ReportOutcome};
