//! Conversion of raw project records into [`Item`]s.
//!
//! Raw records come from the data source as loosely-typed JSON objects. Parsing
//! never fails: every missing or malformed field resolves to a default, and
//! unknown enum labels are mapped through the lookup tables below.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use super::types::{Item, ItemTimestamps, Priority, Status};

/// Number field name used by the project board for estimates.
pub const ESTIMATE_FIELD: &str = "estimate (Hrs)";

const DEFAULT_STATUS_LABEL: &str = "Backlog";
const DEFAULT_PRIORITY_LABEL: &str = "P2";

/// Resolve a raw status label. Unknown labels land in Backlog.
pub fn status_from_raw(raw: Option<&str>) -> Status {
    raw.and_then(Status::from_label).unwrap_or(Status::Backlog)
}

/// Resolve a raw priority label.
///
/// Older clients garbled the multi-byte fire emoji into a handful of bytes,
/// leaving values such as `"P≡ا¤ح"`. Any unknown label that starts with `P`
/// and is longer than two characters is therefore taken to be Fire; everything
/// else falls back to P2.
pub fn priority_from_raw(raw: Option<&str>) -> Priority {
    match raw {
        Some(label) => Priority::from_label(label).unwrap_or_else(|| recover_priority(label)),
        None => Priority::P2,
    }
}

fn recover_priority(label: &str) -> Priority {
    if looks_like_garbled_fire(label) {
        log::warn!("Recovered corrupted priority {label:?} as {}", Priority::Fire);
        Priority::Fire
    } else {
        log::debug!("Unknown priority {label:?}, defaulting to {}", Priority::P2);
        Priority::P2
    }
}

fn looks_like_garbled_fire(label: &str) -> bool {
    label.starts_with('P') && label.chars().count() > 2
}

/// Parse one raw record. Never fails; see the module docs for the rules.
pub fn parse_item(raw: &Value) -> Item {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);
    let content = record
        .get("content")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let status_label = match record.get("status") {
        None => Some(DEFAULT_STATUS_LABEL),
        Some(value) => value.as_str(),
    };
    let priority_label = match record.get("priority") {
        None => Some(DEFAULT_PRIORITY_LABEL),
        Some(value) => value.as_str(),
    };

    Item {
        id: identifier(record.get("id")),
        title: string_field(record, "title"),
        status: status_from_raw(status_label),
        priority: priority_from_raw(priority_label),
        assignees: string_list(record.get("assignees")),
        estimate_hours: record.get(ESTIMATE_FIELD).and_then(Value::as_f64),
        labels: string_list(record.get("labels")),
        url: string_field(content, "url"),
        repository: string_field(content, "repository"),
        issue_number: content.get("number").and_then(Value::as_u64),
        timestamps: parse_timestamps(record),
    }
}

/// Parse every record in order. Records are never dropped.
pub fn parse_items(raw_items: &[Value]) -> Vec<Item> {
    raw_items.iter().map(parse_item).collect()
}

fn identifier(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    }
}

fn string_field(record: &Map<String, Value>, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_timestamps(record: &Map<String, Value>) -> ItemTimestamps {
    let read = |key: &str| record.get(key).and_then(Value::as_str).and_then(|raw| parse_instant(key, raw));

    ItemTimestamps {
        project_created_at: read("project_created_at"),
        project_updated_at: read("project_updated_at"),
        issue_created_at: read("issue_created_at"),
        issue_updated_at: read("issue_updated_at"),
        issue_closed_at: read("issue_closed_at"),
    }
}

fn parse_instant(key: &str, raw: &str) -> Option<DateTime<Utc>> {
    match parse_datetime(raw) {
        Some(instant) => Some(instant),
        None => {
            log::warn!("Ignoring unparseable {key} value {raw:?}");
            None
        }
    }
}

/// Accepts RFC 3339 instants and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}
