pub mod writers;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::config::ReportFormat;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// `<dir>/report-YYYYmmdd-HHMMSS.<ext>`
pub fn default_output_path(dir: &Path, format: ReportFormat, at: DateTime<Utc>) -> PathBuf {
    dir.join(format!(
        "report-{}.{}",
        at.format("%Y%m%d-%H%M%S"),
        format.extension()
    ))
}
