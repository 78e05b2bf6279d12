//! End-to-end report runs against an in-memory project.

mod common;

use chrono::{TimeZone, Utc};
use common::{board, raw_item, FixtureSource};
use ghreport::commands::{generate_report, ReportOptions};
use ghreport::config::{ReportConfig, ReportFormat};
use ghreport::core::{Item, Priority, Status};
use ghreport::formatting::{FormattingConfig, Progress};
use ghreport::metrics::DateField;
use ghreport::SnapshotStore;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn config_in(temp: &TempDir, format: ReportFormat) -> ReportConfig {
    ReportConfig {
        owner: "acme".to_string(),
        project_number: 7,
        default_format: format,
        output_directory: temp.path().join("reports"),
        snapshot_directory: temp.path().join("snapshots"),
        ..ReportConfig::default()
    }
}

fn quiet() -> Progress {
    Progress::new(FormattingConfig::plain())
}

#[test]
fn test_markdown_report_with_first_snapshot() {
    let temp = TempDir::new().unwrap();
    let config = config_in(&temp, ReportFormat::Markdown);
    let source = FixtureSource::new(board());

    let outcome = generate_report(&config, &ReportOptions::default(), &source, &quiet()).unwrap();

    assert_eq!(outcome.metrics.total_items, 4);
    assert_eq!(outcome.metrics.completion_percentage, 25.0);
    assert_eq!(outcome.metrics.unplanned_count, 2);
    assert_eq!(outcome.metrics.unplanned_percentage, 50.0);
    assert_eq!(outcome.metrics.high_priority_not_started, 2);
    assert_eq!(outcome.metrics.total_estimate_hours, 12.0);
    assert_eq!(outcome.items[3].priority, Priority::Fire);

    // first run has no baseline
    assert!(outcome.diff.is_none());
    let snapshot = outcome.snapshot.expect("snapshot saved");
    assert!(snapshot.starts_with(temp.path().join("snapshots")));

    let output = outcome.output.expect("report written to a file");
    assert_eq!(output.extension().and_then(|e| e.to_str()), Some("md"));
    let markdown = fs::read_to_string(&output).unwrap();
    assert!(markdown.contains("Platform Roadmap"));
    assert!(markdown.contains("Login outage"));
}

#[test]
fn test_second_run_is_compared_with_previous_snapshot() {
    let temp = TempDir::new().unwrap();
    let config = config_in(&temp, ReportFormat::Json);
    let store = SnapshotStore::new(&config.snapshot_directory);
    store
        .save_at(
            &[
                Item::new("PVTI_2", "Rate limiter", Status::InReview, Priority::P0),
                Item::new("PVTI_3", "Billing export", Status::Todo, Priority::P1),
            ],
            Utc.with_ymd_and_hms(2020, 1, 1, 9, 0, 0).unwrap(),
        )
        .unwrap();

    let outcome = generate_report(
        &config,
        &ReportOptions::default(),
        &FixtureSource::new(board()),
        &quiet(),
    )
    .unwrap();

    let diff = outcome.diff.expect("baseline exists");
    assert_eq!(diff.items_completed, 1);
    assert_eq!(diff.items_added, 2);
    assert_eq!(diff.status_changes.len(), 2);
    assert_eq!(store.list().unwrap().len(), 2);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(outcome.output.unwrap()).unwrap()).unwrap();
    assert_eq!(json["metadata"]["project_name"], "Platform Roadmap");
    assert_eq!(json["metadata"]["total_items"], 4);
    assert_eq!(json["changes"]["items_completed"], 1);
}

#[test]
fn test_no_snapshot_leaves_directory_untouched() {
    let temp = TempDir::new().unwrap();
    let config = config_in(&temp, ReportFormat::Csv);
    let options = ReportOptions {
        no_snapshot: true,
        output: Some(temp.path().join("out/board.csv")),
        ..ReportOptions::default()
    };

    let outcome = generate_report(&config, &options, &FixtureSource::new(board()), &quiet()).unwrap();

    assert!(outcome.snapshot.is_none());
    assert!(!temp.path().join("snapshots").exists());
    let csv = fs::read_to_string(temp.path().join("out/board.csv")).unwrap();
    assert!(csv.starts_with('\u{feff}'));
    assert_eq!(csv.lines().count(), 5);
}

#[test]
fn test_missing_title_falls_back_to_number() {
    let temp = TempDir::new().unwrap();
    let config = config_in(&temp, ReportFormat::Html);
    let mut source = FixtureSource::new(board());
    source.title = None;
    let options = ReportOptions {
        no_snapshot: true,
        ..ReportOptions::default()
    };

    let outcome = generate_report(&config, &options, &source, &quiet()).unwrap();

    let html = fs::read_to_string(outcome.output.unwrap()).unwrap();
    assert!(html.contains("Project 7"));
}

#[test]
fn test_date_range_limits_metrics_but_not_snapshot() {
    let temp = TempDir::new().unwrap();
    let config = config_in(&temp, ReportFormat::Markdown);
    let mut items = board();
    items[0]["issue_created_at"] = "2025-01-10T12:00:00Z".into();
    items[1]["issue_created_at"] = "2025-02-10T12:00:00Z".into();
    let options = ReportOptions {
        since: Some("2025-01-01".to_string()),
        until: Some("2025-01-31".to_string()),
        date_field: DateField::IssueCreated,
        ..ReportOptions::default()
    };

    let outcome = generate_report(&config, &options, &FixtureSource::new(items), &quiet()).unwrap();

    assert_eq!(outcome.metrics.total_items, 1);
    assert_eq!(outcome.items[0].title, "Login outage");
    let saved = SnapshotStore::load(&outcome.snapshot.unwrap()).unwrap();
    assert_eq!(saved.items.len(), 4);
}

#[test]
fn test_invalid_date_is_rejected_before_fetching() {
    let temp = TempDir::new().unwrap();
    let config = config_in(&temp, ReportFormat::Markdown);
    let options = ReportOptions {
        since: Some("last tuesday".to_string()),
        ..ReportOptions::default()
    };

    let result = generate_report(
        &config,
        &options,
        &FixtureSource::new(vec![raw_item("1", "x", "Todo", "P1")]),
        &quiet(),
    );

    assert!(result.is_err());
    assert!(!temp.path().join("snapshots").exists());
}
