//! Report renderers. Every writer targets any `W: Write` and only reads the
//! report it is given.

pub mod csv;
pub mod html;
pub mod json;
pub mod markdown;
pub mod terminal;

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Utc};

use crate::config::ReportFormat;
use crate::core::{Item, Priority};
use crate::metrics::{ProjectMetrics, WorkloadPolicy};
use crate::snapshot::SnapshotDiff;

pub use self::csv::CsvWriter;
pub use html::HtmlWriter;
pub use json::JsonWriter;
pub use markdown::MarkdownWriter;
pub use terminal::TerminalWriter;

/// Who and when, for report headers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportContext {
    pub project_name: String,
    pub owner: String,
    pub project_number: u32,
    pub generated_at: DateTime<Utc>,
    pub workload: WorkloadPolicy,
}

impl ReportContext {
    pub fn new(project_name: impl Into<String>, owner: impl Into<String>, project_number: u32) -> Self {
        Self {
            project_name: project_name.into(),
            owner: owner.into(),
            project_number,
            generated_at: Utc::now(),
            workload: WorkloadPolicy::default(),
        }
    }

    pub fn with_workload_policy(mut self, workload: WorkloadPolicy) -> Self {
        self.workload = workload;
        self
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

/// Everything a renderer needs for one run.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub items: &'a [Item],
    pub metrics: &'a ProjectMetrics,
    pub diff: Option<&'a SnapshotDiff>,
    pub context: &'a ReportContext,
}

impl<'a> Report<'a> {
    pub fn new(items: &'a [Item], metrics: &'a ProjectMetrics, context: &'a ReportContext) -> Self {
        Self {
            items,
            metrics,
            diff: None,
            context,
        }
    }

    pub fn with_diff(mut self, diff: Option<&'a SnapshotDiff>) -> Self {
        self.diff = diff;
        self
    }

    /// Active items per assignee after the configured exclusions.
    pub fn workload(&self) -> BTreeMap<String, usize> {
        self.context.workload.workload(&self.metrics.items_by_assignee)
    }

    /// Fire and P0 items, Fire first, then by title.
    pub fn high_priority_items(&self) -> Vec<&'a Item> {
        let mut items: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| item.priority.is_high())
            .collect();
        items.sort_by(|a, b| {
            (a.priority != Priority::Fire, &a.title).cmp(&(b.priority != Priority::Fire, &b.title))
        });
        items
    }
}

pub trait ReportWriter {
    fn write_report(&mut self, report: &Report<'_>) -> anyhow::Result<()>;
}

/// Writer for `format` over `out`.
pub fn create_writer<'w, W: Write + 'w>(format: ReportFormat, out: W) -> Box<dyn ReportWriter + 'w> {
    match format {
        ReportFormat::Html => Box::new(HtmlWriter::new(out)),
        ReportFormat::Markdown => Box::new(MarkdownWriter::new(out)),
        ReportFormat::Json => Box::new(JsonWriter::new(out)),
        ReportFormat::Csv => Box::new(CsvWriter::new(out)),
        ReportFormat::Terminal => Box::new(TerminalWriter::new(out)),
    }
}

/// `", "`-joined list, or `fallback` when empty.
pub(crate) fn join_or(values: &[String], fallback: &str) -> String {
    if values.is_empty() {
        fallback.to_string()
    } else {
        values.join(", ")
    }
}

/// Estimate without a trailing `.0`.
pub(crate) fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{}", hours as i64)
    } else {
        format!("{hours}")
    }
}
