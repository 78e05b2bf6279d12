use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow column of a project item.
///
/// Variant order is the board's left-to-right order and drives the ordering
/// of every status grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
    Backlog,
    Todo,
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "In Review")]
    InReview,
    Done,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Backlog,
        Status::Todo,
        Status::Pending,
        Status::InProgress,
        Status::InReview,
        Status::Done,
    ];

    /// Label used by the project board and in snapshot files.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Backlog => "Backlog",
            Status::Todo => "Todo",
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::InReview => "In Review",
            Status::Done => "Done",
        }
    }

    /// Exact-match lookup of a board label. No fallback is applied here.
    pub fn from_label(label: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|status| status.label() == label)
    }

    pub fn is_not_started(&self) -> bool {
        matches!(self, Status::Backlog | Status::Todo)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Priority field of a project item. `Fire` marks unplanned, urgent work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "P🔥")]
    Fire,
    P0,
    P1,
    P2,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Fire, Priority::P0, Priority::P1, Priority::P2];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Fire => "P🔥",
            Priority::P0 => "P0",
            Priority::P1 => "P1",
            Priority::P2 => "P2",
        }
    }

    pub fn from_label(label: &str) -> Option<Priority> {
        Priority::ALL
            .into_iter()
            .find(|priority| priority.label() == label)
    }

    /// Fire and P0 items are the ones triaged as high priority.
    pub fn is_high(&self) -> bool {
        matches!(self, Priority::Fire | Priority::P0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Optional lifecycle instants reported by the GraphQL source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTimestamps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_closed_at: Option<DateTime<Utc>>,
}

impl ItemTimestamps {
    pub fn is_empty(&self) -> bool {
        *self == ItemTimestamps::default()
    }
}

/// One tracked unit of work on the project board.
///
/// The serialized field names are the snapshot file format; timestamps are
/// flattened in as optional extra keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub status: Status,
    pub priority: Priority,
    pub assignees: Vec<String>,
    pub estimate_hours: Option<f64>,
    pub labels: Vec<String>,
    pub url: String,
    pub repository: String,
    pub issue_number: Option<u64>,
    #[serde(default, flatten)]
    pub timestamps: ItemTimestamps,
}

impl Item {
    /// Minimal item with empty metadata; used by tests and by callers that
    /// assemble items outside the parser.
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: Status, priority: Priority) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            priority,
            assignees: Vec::new(),
            estimate_hours: None,
            labels: Vec::new(),
            url: String::new(),
            repository: String::new(),
            issue_number: None,
            timestamps: ItemTimestamps::default(),
        }
    }

    pub fn with_assignees<I, S>(mut self, assignees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees = assignees.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_estimate(mut self, hours: f64) -> Self {
        self.estimate_hours = Some(hours);
        self
    }

    /// Anything that is not Fire was planned.
    pub fn is_planned(&self) -> bool {
        self.priority != Priority::Fire
    }

    /// Anything that is not Done is still active.
    pub fn is_active(&self) -> bool {
        self.status != Status::Done
    }

    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }

    pub fn is_unassigned(&self) -> bool {
        self.assignees.is_empty()
    }
}
