//! Run-over-run change detection between two item lists, matched by id.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::core::{Item, Status};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub id: String,
    pub title: String,
    pub from_status: Status,
    pub to_status: Status,
}

/// What moved since the previous snapshot. Items that disappeared between the
/// two lists are not reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotDiff {
    pub items_completed: usize,
    pub items_added: usize,
    /// In the iteration order of the current list.
    pub status_changes: Vec<StatusChange>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.items_completed == 0 && self.items_added == 0 && self.status_changes.is_empty()
    }
}

/// Compare `current` against `previous`.
///
/// Without a previous snapshot there is no baseline and the result is empty.
/// A transition into Done counts as a completion and is also listed as a
/// status change.
pub fn compare_snapshots(current: &[Item], previous: Option<&[Item]>) -> SnapshotDiff {
    let Some(previous) = previous else {
        return SnapshotDiff::default();
    };

    // Later duplicates win.
    let before: HashMap<&str, &Item> = previous.iter().map(|item| (item.id.as_str(), item)).collect();

    let mut added: HashSet<&str> = HashSet::new();
    let mut diff = current.iter().fold(SnapshotDiff::default(), |mut diff, item| {
        match before.get(item.id.as_str()) {
            None => {
                added.insert(item.id.as_str());
            }
            Some(old) if old.status != item.status => {
                if item.is_done() {
                    diff.items_completed += 1;
                }
                diff.status_changes.push(StatusChange {
                    id: item.id.clone(),
                    title: item.title.clone(),
                    from_status: old.status,
                    to_status: item.status,
                });
            }
            Some(_) => {}
        }
        diff
    });
    // counted per id, not per record
    diff.items_added = added.len();
    diff
}
