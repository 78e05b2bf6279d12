//! Layered configuration: file (TOML or JSON), then command-line overrides,
//! then validation.

pub mod core;
pub mod loader;
pub mod validation;

pub use self::core::{ConfigOverrides, ReportConfig, ReportFormat, DEFAULT_CONFIG_TEMPLATE};
pub use loader::{load_config, parse_config};
pub use validation::{validate_config, validate_config_result};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ghreport.toml";
