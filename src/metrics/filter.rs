//! Date-range predicate applied before aggregation.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::errors::{Error, Result};
use crate::core::parsing::parse_datetime;
use crate::core::Item;

/// Which item timestamp a [`DateRange`] is checked against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    #[default]
    IssueCreated,
    IssueUpdated,
    IssueClosed,
    ProjectCreated,
    ProjectUpdated,
}

impl DateField {
    pub fn read(&self, item: &Item) -> Option<DateTime<Utc>> {
        let timestamps = &item.timestamps;
        match self {
            DateField::IssueCreated => timestamps.issue_created_at,
            DateField::IssueUpdated => timestamps.issue_updated_at,
            DateField::IssueClosed => timestamps.issue_closed_at,
            DateField::ProjectCreated => timestamps.project_created_at,
            DateField::ProjectUpdated => timestamps.project_updated_at,
        }
    }
}

/// Inclusive `[start, end]` window over one item timestamp. Either bound may
/// be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub field: DateField,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>, field: DateField) -> Self {
        Self { start, end, field }
    }

    /// Build a range from user-supplied bounds (`YYYY-MM-DD` or RFC 3339).
    pub fn parse(start: Option<&str>, end: Option<&str>, field: DateField) -> Result<Self> {
        let bound = |raw: Option<&str>| -> Result<Option<DateTime<Utc>>> {
            raw.map(|value| parse_datetime(value).ok_or_else(|| Error::DateRange(value.to_string())))
                .transpose()
        };
        Ok(Self::new(bound(start)?, bound(end)?, field))
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// An unbounded range admits everything; otherwise items lacking the
    /// chosen timestamp are rejected.
    pub fn contains(&self, item: &Item) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(instant) = self.field.read(item) else {
            return false;
        };
        self.start.is_none_or(|start| instant >= start) && self.end.is_none_or(|end| instant <= end)
    }
}

/// Keep the items inside `range`, preserving order.
pub fn filter_by_date_range(items: &[Item], range: &DateRange) -> Vec<Item> {
    items
        .iter()
        .filter(|item| range.contains(item))
        .cloned()
        .collect()
}
