use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use super::{Report, ReportWriter};
use crate::core::{Item, Priority, Status};
use crate::metrics::group_counts;
use crate::snapshot::SnapshotDiff;

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: Metadata<'a>,
    metrics: HeadlineMetrics,
    items: Vec<JsonItem<'a>>,
    grouped_data: GroupedData,
    #[serde(skip_serializing_if = "Option::is_none")]
    changes: Option<&'a SnapshotDiff>,
}

#[derive(Serialize)]
struct Metadata<'a> {
    project_name: &'a str,
    owner: &'a str,
    project_number: u32,
    generation_timestamp: String,
    total_items: usize,
}

#[derive(Serialize)]
struct HeadlineMetrics {
    total_items: usize,
    total_estimate_hours: f64,
    completion_percentage: f64,
    planned_count: usize,
    unplanned_count: usize,
    unplanned_percentage: f64,
    high_priority_not_started: usize,
    active_items: usize,
    active_completion_percentage: f64,
    unplanned_done_percentage: f64,
}

#[derive(Serialize)]
struct JsonItem<'a> {
    #[serde(flatten)]
    item: &'a Item,
    is_planned: bool,
    is_active: bool,
}

#[derive(Serialize)]
struct GroupedData {
    by_status: BTreeMap<Status, usize>,
    by_priority: BTreeMap<Priority, usize>,
    by_assignee: BTreeMap<String, usize>,
}

impl<'a> JsonReport<'a> {
    fn from_report(report: &Report<'a>) -> Self {
        let metrics = report.metrics;
        Self {
            metadata: Metadata {
                project_name: &report.context.project_name,
                owner: &report.context.owner,
                project_number: report.context.project_number,
                generation_timestamp: report
                    .context
                    .generated_at
                    .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                total_items: metrics.total_items,
            },
            metrics: HeadlineMetrics {
                total_items: metrics.total_items,
                total_estimate_hours: metrics.total_estimate_hours,
                completion_percentage: metrics.completion_percentage,
                planned_count: metrics.planned_count,
                unplanned_count: metrics.unplanned_count,
                unplanned_percentage: metrics.unplanned_percentage,
                high_priority_not_started: metrics.high_priority_not_started,
                active_items: metrics.active_items,
                active_completion_percentage: metrics.active_completion_percentage,
                unplanned_done_percentage: metrics.unplanned_done_percentage,
            },
            items: report
                .items
                .iter()
                .map(|item| JsonItem {
                    item,
                    is_planned: item.is_planned(),
                    is_active: item.is_active(),
                })
                .collect(),
            grouped_data: GroupedData {
                by_status: group_counts(&metrics.items_by_status),
                by_priority: group_counts(&metrics.items_by_priority),
                by_assignee: group_counts(&metrics.items_by_assignee),
            },
            changes: report.diff,
        }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&JsonReport::from_report(report))?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::render;
    use crate::config::ReportFormat;
    use crate::core::Status;
    use crate::snapshot::{SnapshotDiff, StatusChange};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn rendered(diff: Option<&SnapshotDiff>) -> Value {
        serde_json::from_str(&render(ReportFormat::Json, diff)).unwrap()
    }

    #[test]
    fn test_metadata_and_metrics() {
        let json = rendered(None);

        assert_eq!(json["metadata"]["project_name"], "Shop Board");
        assert_eq!(json["metadata"]["owner"], "acme");
        assert_eq!(json["metadata"]["project_number"], 2);
        assert_eq!(json["metadata"]["generation_timestamp"], "2025-01-15T10:30:00Z");
        assert_eq!(json["metadata"]["total_items"], 4);
        assert_eq!(json["metrics"]["completion_percentage"], 25.0);
        assert_eq!(json["metrics"]["unplanned_count"], 1);
        assert_eq!(json["metrics"]["high_priority_not_started"], 2);
        assert!(json.get("changes").is_none());
    }

    #[test]
    fn test_items_carry_derived_flags() {
        let json = rendered(None);
        let first = &json["items"][0];

        assert_eq!(first["id"], "1");
        assert_eq!(first["priority"], "P🔥");
        assert_eq!(first["is_planned"], false);
        assert_eq!(first["is_active"], true);
        assert_eq!(json["items"][2]["is_active"], false);
    }

    #[test]
    fn test_grouped_counts() {
        let json = rendered(None);

        assert_eq!(json["grouped_data"]["by_status"]["In Progress"], 1);
        assert_eq!(json["grouped_data"]["by_priority"]["P0"], 2);
        assert_eq!(json["grouped_data"]["by_assignee"]["ana"], 2);
        assert_eq!(json["grouped_data"]["by_assignee"]["Unassigned"], 1);
    }

    #[test]
    fn test_changes_are_included_when_present() {
        let diff = SnapshotDiff {
            items_completed: 1,
            items_added: 0,
            status_changes: vec![StatusChange {
                id: "3".into(),
                title: "Audit logging".into(),
                from_status: Status::InReview,
                to_status: Status::Done,
            }],
        };
        let json = rendered(Some(&diff));

        assert_eq!(json["changes"]["items_completed"], 1);
        assert_eq!(
            json["changes"]["status_changes"][0],
            json!({"id": "3", "title": "Audit logging", "from_status": "In Review", "to_status": "Done"})
        );
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let output = render(ReportFormat::Json, None);
        assert!(output.contains("بهبود مستندات"));
        assert!(output.contains("P🔥"));
    }
}
