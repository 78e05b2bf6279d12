//! `ghreport diff`: compare two stored snapshots without touching GitHub.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::DiffFormat;
use crate::formatting::Progress;
use crate::snapshot::{compare_snapshots, Snapshot, SnapshotDiff, SnapshotStore};

/// Which two snapshots to compare.
#[derive(Debug, Clone)]
pub enum DiffTarget {
    /// The two most recent snapshots in a directory
    Latest(PathBuf),
    Files { before: PathBuf, after: PathBuf },
}

#[derive(Debug, Clone)]
pub struct DiffConfig {
    pub target: DiffTarget,
    pub format: DiffFormat,
}

/// Resolve the pair of snapshots, oldest first. `None` when a directory holds
/// fewer than two.
pub fn resolve_pair(target: &DiffTarget) -> Result<Option<(Snapshot, Snapshot)>> {
    match target {
        DiffTarget::Files { before, after } => Ok(Some((load(before)?, load(after)?))),
        DiffTarget::Latest(dir) => {
            let store = SnapshotStore::new(dir);
            let after = store.nth_latest(0)?;
            let before = store.nth_latest(1)?;
            Ok(before.zip(after))
        }
    }
}

fn load(path: &Path) -> Result<Snapshot> {
    SnapshotStore::load(path).with_context(|| format!("Failed to load snapshot {}", path.display()))
}

pub fn diff_snapshots(before: &Snapshot, after: &Snapshot) -> SnapshotDiff {
    compare_snapshots(&after.items, Some(before.items.as_slice()))
}

pub fn handle_diff(config: DiffConfig, progress: &Progress) -> Result<()> {
    let Some((before, after)) = resolve_pair(&config.target)? else {
        if let DiffTarget::Latest(dir) = &config.target {
            progress.warning(&format!(
                "Need at least two snapshots in {} to compare",
                dir.display()
            ));
        }
        return Ok(());
    };

    let diff = diff_snapshots(&before, &after);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match config.format {
        DiffFormat::Json => write_json(&mut out, &before, &after, &diff)?,
        DiffFormat::Terminal => write_terminal(&mut out, &before, &after, &diff)?,
    }
    Ok(())
}

pub fn write_json<W: Write>(
    out: &mut W,
    before: &Snapshot,
    after: &Snapshot,
    diff: &SnapshotDiff,
) -> Result<()> {
    let value = serde_json::json!({
        "before": before.timestamp,
        "after": after.timestamp,
        "changes": diff,
    });
    serde_json::to_writer_pretty(&mut *out, &value)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_terminal<W: Write>(
    out: &mut W,
    before: &Snapshot,
    after: &Snapshot,
    diff: &SnapshotDiff,
) -> Result<()> {
    writeln!(
        out,
        "{} {} -> {}",
        "Snapshot diff:".bold(),
        before.timestamp.format("%Y-%m-%d %H:%M:%S"),
        after.timestamp.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "  Items completed: {}", diff.items_completed.to_string().green())?;
    writeln!(out, "  Items added:     {}", diff.items_added)?;
    writeln!(out, "  Status changes:  {}", diff.status_changes.len())?;

    for change in &diff.status_changes {
        writeln!(
            out,
            "    #{} {}: {} -> {}",
            change.id, change.title, change.from_status, change.to_status
        )?;
    }
    if diff.is_empty() {
        writeln!(out, "  No changes.")?;
    }
    Ok(())
}
