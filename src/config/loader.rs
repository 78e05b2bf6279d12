use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use super::core::ReportConfig;

/// Read the raw contents of a config file.
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Parse config contents. `.json` files use JSON, everything else TOML.
pub fn parse_config(path: &Path, contents: &str) -> Result<ReportConfig, String> {
    if is_json(path) {
        serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    } else {
        toml::from_str(contents).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }
}

/// Load the file at `config_path`, or `None` when it is absent or unusable.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<ReportConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(config_path, &contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Only real failures are worth a warning; a missing file just means defaults.
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}. Using defaults.",
            config_path.display(),
            error
        );
    }
}

pub fn load_config(config_path: &Path) -> ReportConfig {
    try_load_config_from_path(config_path).unwrap_or_else(|| {
        log::debug!(
            "No usable config at {}. Using default config.",
            config_path.display()
        );
        ReportConfig::default()
    })
}
