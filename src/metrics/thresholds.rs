//! Traffic-light classification of headline metrics and team workload.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::grouping::AssigneeGroups;

/// Health tier shown next to a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Green,
    Yellow,
    Red,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Green => "green",
            Tier::Yellow => "yellow",
            Tier::Red => "red",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            Tier::Green => "#22c55e",
            Tier::Yellow => "#eab308",
            Tier::Red => "#ef4444",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Tier::Green => "✅",
            Tier::Yellow => "⚠️",
            Tier::Red => "❌",
        }
    }
}

/// Higher completion is better.
pub fn completion_tier(percentage: f64) -> Tier {
    if percentage > 70.0 {
        Tier::Green
    } else if percentage < 30.0 {
        Tier::Red
    } else {
        Tier::Yellow
    }
}

/// Lower unplanned share is better.
pub fn unplanned_tier(percentage: f64) -> Tier {
    if percentage < 10.0 {
        Tier::Green
    } else if percentage > 20.0 {
        Tier::Red
    } else {
        Tier::Yellow
    }
}

/// Share of finished work that was unplanned; a planning-accuracy signal.
pub fn unplanned_done_tier(percentage: f64) -> Tier {
    if percentage < 20.0 {
        Tier::Green
    } else if percentage > 40.0 {
        Tier::Red
    } else {
        Tier::Yellow
    }
}

pub fn high_priority_tier(count: usize) -> Tier {
    match count {
        0 => Tier::Green,
        1..=5 => Tier::Yellow,
        _ => Tier::Red,
    }
}

/// Active items per person: 6 through 10 inclusive is the middle tier.
pub fn workload_tier(active_count: usize) -> Tier {
    match active_count {
        0..=5 => Tier::Green,
        6..=10 => Tier::Yellow,
        _ => Tier::Red,
    }
}

/// Which assignees to leave out of workload figures (e.g. a TPM who is on
/// every item but does not carry delivery work).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadPolicy {
    excluded: BTreeSet<String>,
}

impl WorkloadPolicy {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_excluded(&self, assignee: &str) -> bool {
        self.excluded.contains(assignee)
    }

    /// Active (not Done) item count per assignee, skipping excluded assignees
    /// and anyone with no active items.
    pub fn workload(&self, groups: &AssigneeGroups) -> BTreeMap<String, usize> {
        groups
            .iter()
            .filter(|(assignee, _)| !self.is_excluded(assignee))
            .map(|(assignee, items)| {
                let active = items.iter().filter(|item| item.is_active()).count();
                (assignee.clone(), active)
            })
            .filter(|(_, active)| *active > 0)
            .collect()
    }
}
