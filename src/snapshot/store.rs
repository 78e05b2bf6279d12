//! Write-once, timestamped snapshot files.
//!
//! Files are named `snapshot-YYYYmmdd-HHMMSS.json` (UTC) so that sorting file
//! names sorts snapshots chronologically. A file is never rewritten once
//! created.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::{Error, Result};
use crate::core::Item;

pub const SNAPSHOT_PREFIX: &str = "snapshot-";
pub const SNAPSHOT_EXTENSION: &str = "json";
const FILENAME_TIME_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Items captured at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub items: Vec<Item>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    timestamp: DateTime<Utc>,
    items: &'a [Item],
}

/// File name for a snapshot taken at `at`, at one-second resolution.
pub fn snapshot_file_name(at: DateTime<Utc>) -> String {
    format!(
        "{SNAPSHOT_PREFIX}{}.{SNAPSHOT_EXTENSION}",
        at.format(FILENAME_TIME_FORMAT)
    )
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist `items` as a new snapshot stamped with the current time.
    pub fn save(&self, items: &[Item]) -> Result<PathBuf> {
        self.save_at(items, Utc::now())
    }

    /// Persist `items` as a new snapshot stamped `at`. Creates the directory
    /// when missing and refuses to replace an existing file.
    pub fn save_at(&self, items: &[Item], at: DateTime<Utc>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(snapshot_file_name(at));

        let json = serde_json::to_string_pretty(&SnapshotRef {
            timestamp: at,
            items,
        })?;

        write_new_file(&path, |file| file.write_all(json.as_bytes()))?;

        log::info!("Saved snapshot of {} items to {}", items.len(), path.display());
        Ok(path)
    }

    /// Snapshot files in chronological (file name) order. A missing directory
    /// is simply empty.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let pattern = format!(
            "{}/{SNAPSHOT_PREFIX}*.{SNAPSHOT_EXTENSION}",
            glob::Pattern::escape(&self.dir.to_string_lossy())
        );

        let mut paths: Vec<PathBuf> = glob::glob(&pattern)?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("Skipping unreadable snapshot entry: {e}");
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    /// Decode one snapshot file. Unknown status or priority labels are a
    /// corruption error; no recovery is attempted for stored data.
    pub fn load(path: &Path) -> Result<Snapshot> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::corrupt_snapshot(path, e))
    }

    /// Items of the most recent snapshot, if any exists.
    pub fn load_latest(&self) -> Result<Option<Vec<Item>>> {
        Ok(self.nth_latest(0)?.map(|snapshot| snapshot.items))
    }

    /// Items of the snapshot before the most recent one. This is the baseline
    /// to diff against right after saving the current run.
    pub fn load_previous(&self) -> Result<Option<Vec<Item>>> {
        Ok(self.nth_latest(1)?.map(|snapshot| snapshot.items))
    }

    /// `n = 0` is the latest snapshot, `n = 1` the one before it.
    pub fn nth_latest(&self, n: usize) -> Result<Option<Snapshot>> {
        let paths = self.list()?;
        match paths.iter().rev().nth(n) {
            Some(path) => {
                log::debug!("Loading snapshot {}", path.display());
                Self::load(path).map(Some)
            }
            None => Ok(None),
        }
    }
}

/// Create `path` (never replacing it) and fill it with `write`. A file whose
/// write fails is removed again so no truncated snapshot is left behind.
fn write_new_file(
    path: &Path,
    write: impl FnOnce(&mut fs::File) -> std::io::Result<()>,
) -> Result<()> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(Error::SnapshotExists(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    if let Err(e) = write(&mut file).and_then(|()| file.sync_all()) {
        drop(file);
        if let Err(remove_err) = fs::remove_file(path) {
            log::warn!("Could not remove partial snapshot {}: {remove_err}", path.display());
        }
        return Err(e.into());
    }
    Ok(())
}
