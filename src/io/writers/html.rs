use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::Value;

use super::{format_hours, join_or, Report, ReportWriter};
use crate::charts::{priority_color, ChartBuilder};
use crate::core::Item;
use crate::metrics::{
    completion_tier, group_counts, high_priority_tier, unplanned_done_tier, unplanned_tier,
};

pub struct HtmlWriter<W: Write> {
    writer: W,
    template: &'static str,
    charts: ChartBuilder,
}

impl<W: Write> HtmlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            template: include_str!("templates/report.html"),
            charts: ChartBuilder::default(),
        }
    }

    pub fn with_chart_builder(mut self, charts: ChartBuilder) -> Self {
        self.charts = charts;
        self
    }

    fn render_html(&self, report: &Report<'_>) -> Result<String> {
        let ctx = report.context;
        let m = report.metrics;

        let status_chart = self.charts.status_pie(&group_counts(&m.items_by_status));
        let priority_chart = self.charts.priority_bar(&group_counts(&m.items_by_priority));
        let planned_chart = self.charts.planned_vs_unplanned(m.planned_count, m.unplanned_count);
        let workload_chart = self.charts.team_workload(&report.workload());

        let html = self
            .template
            .replace("{{{PROJECT_NAME}}}", &escape_text(&ctx.project_name))
            .replace("{{{OWNER}}}", &escape_text(&ctx.owner))
            .replace("{{{PROJECT_NUMBER}}}", &ctx.project_number.to_string())
            .replace(
                "{{{TIMESTAMP}}}",
                &ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            )
            .replace("{{{TOTAL_ITEMS}}}", &m.total_items.to_string())
            .replace("{{{TOTAL_ESTIMATE}}}", &format_hours(m.total_estimate_hours))
            .replace(
                "{{{COMPLETION_TIER}}}",
                completion_tier(m.active_completion_percentage).as_str(),
            )
            .replace(
                "{{{ACTIVE_COMPLETION}}}",
                &format!("{:.1}", m.active_completion_percentage),
            )
            .replace("{{{ACTIVE_ITEMS}}}", &m.active_items.to_string())
            .replace("{{{COMPLETION}}}", &format!("{:.1}", m.completion_percentage))
            .replace(
                "{{{UNPLANNED_TIER}}}",
                unplanned_tier(m.unplanned_percentage).as_str(),
            )
            .replace("{{{UNPLANNED}}}", &format!("{:.1}", m.unplanned_percentage))
            .replace("{{{UNPLANNED_COUNT}}}", &m.unplanned_count.to_string())
            .replace(
                "{{{ACTIVE_UNPLANNED_TIER}}}",
                unplanned_tier(m.active_unplanned_percentage).as_str(),
            )
            .replace(
                "{{{ACTIVE_UNPLANNED}}}",
                &format!("{:.1}", m.active_unplanned_percentage),
            )
            .replace(
                "{{{ACTIVE_UNPLANNED_COUNT}}}",
                &m.active_unplanned_count.to_string(),
            )
            .replace(
                "{{{UNPLANNED_DONE_TIER}}}",
                unplanned_done_tier(m.unplanned_done_percentage).as_str(),
            )
            .replace(
                "{{{UNPLANNED_DONE}}}",
                &format!("{:.1}", m.unplanned_done_percentage),
            )
            .replace("{{{UNPLANNED_DONE_COUNT}}}", &m.unplanned_done_count.to_string())
            .replace("{{{DONE_ITEMS}}}", &m.done_active_items.to_string())
            .replace(
                "{{{HIGH_PRIORITY_TIER}}}",
                high_priority_tier(m.high_priority_not_started).as_str(),
            )
            .replace("{{{HIGH_PRIORITY}}}", &m.high_priority_not_started.to_string())
            .replace("{{{CHANGES}}}", &render_changes(report))
            .replace("{{{HIGH_PRIORITY_TABLE}}}", &render_high_priority(report))
            .replace("{{{ITEMS_BY_STATUS}}}", &render_items_by_status(report))
            .replace("{{{ALL_ITEMS_TABLE}}}", &render_item_table(report.items))
            .replace("{{{STATUS_CHART}}}", &script_json(&status_chart)?)
            .replace("{{{PRIORITY_CHART}}}", &script_json(&priority_chart)?)
            .replace("{{{PLANNED_CHART}}}", &script_json(&planned_chart)?)
            .replace("{{{WORKLOAD_CHART}}}", &script_json(&workload_chart)?);

        Ok(html)
    }
}

impl<W: Write> ReportWriter for HtmlWriter<W> {
    fn write_report(&mut self, report: &Report<'_>) -> Result<()> {
        let html = self.render_html(report)?;
        write!(self.writer, "{}", html)?;
        Ok(())
    }
}

/// Escaped user text. Braces are encoded too so text can never form a
/// template placeholder.
fn escape_text(text: &str) -> String {
    encode_text(text).replace('{', "&#123;")
}

fn escape_attr(text: &str) -> String {
    encode_double_quoted_attribute(text).replace('{', "&#123;")
}

/// JSON safe to inline in a `<script>` block.
fn script_json(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn title_link(item: &Item) -> String {
    let title = escape_text(&item.title);
    if item.url.is_empty() {
        format!("<span dir=\"auto\">{title}</span>")
    } else {
        format!(
            "<a dir=\"auto\" href=\"{}\">{title}</a>",
            escape_attr(&item.url)
        )
    }
}

fn priority_badge(item: &Item) -> String {
    format!(
        "<span class=\"priority\" style=\"color: {}\">{}</span>",
        priority_color(item.priority),
        item.priority
    )
}

fn render_changes(report: &Report<'_>) -> String {
    let Some(diff) = report.diff else {
        return String::new();
    };

    let mut html = String::from("<section>\n  <h2>Changes Since Last Snapshot</h2>\n");
    let _ = writeln!(
        html,
        "  <p>Completed: {} | Added: {} | Status changes: {}</p>",
        diff.items_completed,
        diff.items_added,
        diff.status_changes.len()
    );
    if !diff.status_changes.is_empty() {
        html.push_str("  <ul>\n");
        for change in &diff.status_changes {
            let _ = writeln!(
                html,
                "    <li><span dir=\"auto\">{}</span>: {} &rarr; {}</li>",
                escape_text(&change.title),
                change.from_status,
                change.to_status
            );
        }
        html.push_str("  </ul>\n");
    }
    html.push_str("</section>");
    html
}

fn render_high_priority(report: &Report<'_>) -> String {
    let items = report.high_priority_items();
    if items.is_empty() {
        return "<p>No high priority items.</p>".to_string();
    }

    let mut html = String::from(
        "<table>\n<thead><tr><th>Priority</th><th>Title</th><th>Status</th><th>Assignees</th><th>Estimate</th></tr></thead>\n<tbody>\n",
    );
    for item in items {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            priority_badge(item),
            title_link(item),
            item.status,
            escape_text(&join_or(&item.assignees, "Unassigned")),
            item.estimate_hours.map(format_hours).unwrap_or_else(|| "-".to_string())
        );
    }
    html.push_str("</tbody>\n</table>");
    html
}

fn render_items_by_status(report: &Report<'_>) -> String {
    let mut html = String::new();
    for (status, items) in &report.metrics.items_by_status {
        let _ = writeln!(
            html,
            "<details>\n<summary>{} ({})</summary>\n<ul>",
            status,
            items.len()
        );
        for item in items {
            let _ = writeln!(
                html,
                "<li>{} {} - {}</li>",
                priority_badge(item),
                title_link(item),
                escape_text(&join_or(&item.assignees, "Unassigned"))
            );
        }
        html.push_str("</ul>\n</details>\n");
    }
    html
}

fn render_item_table(items: &[Item]) -> String {
    let mut html = String::from(
        "<table>\n<thead><tr><th>Title</th><th>Status</th><th>Priority</th><th>Assignees</th><th>Estimate</th><th>Labels</th></tr></thead>\n<tbody>\n",
    );
    for item in items {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            title_link(item),
            item.status,
            priority_badge(item),
            escape_text(&join_or(&item.assignees, "-")),
            item.estimate_hours.map(format_hours).unwrap_or_else(|| "-".to_string()),
            escape_text(&join_or(&item.labels, "-"))
        );
    }
    html.push_str("</tbody>\n</table>");
    html
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{render, sample_context, sample_items};
    use super::*;
    use crate::config::ReportFormat;
    use crate::metrics::calculate_metrics;
    use crate::snapshot::{SnapshotDiff, StatusChange};
    use crate::core::Status;
    use crate::io::writers::ReportContext;

    #[test]
    fn test_html_writer_generates_valid_html() {
        let output = render(ReportFormat::Html, None);

        assert!(output.starts_with("<!DOCTYPE html>"));
        assert!(output.contains("</html>"));
        assert!(output.contains("<h1 dir=\"auto\">Shop Board</h1>"));
        assert!(output.contains("Owner: acme | Project #2"));
    }

    #[test]
    fn test_all_template_variables_substituted() {
        let output = render(ReportFormat::Html, None);
        assert!(!output.contains("{{{"), "unreplaced placeholder in output");
    }

    #[test]
    fn test_metric_cards_carry_tiers() {
        let output = render(ReportFormat::Html, None);

        // 1 done of 3 active items
        assert!(output.contains("<div class=\"card yellow\">\n    <div class=\"label\">Active completion</div>\n    <div class=\"value\">33.3%</div>"));
        assert!(output.contains("<div class=\"card red\">\n    <div class=\"label\">Unplanned</div>"));
    }

    #[test]
    fn test_charts_are_embedded() {
        let output = render(ReportFormat::Html, None);

        assert!(output.contains("\"status-chart\": {\"data\":"));
        assert!(output.contains("Plotly.newPlot"));
        assert!(output.contains("#f97316"));
    }

    #[test]
    fn test_high_priority_table_order() {
        let output = render(ReportFormat::Html, None);
        let table = output.split("<h2>High Priority Items</h2>").nth(1).unwrap();
        let table = table.split("</table>").next().unwrap();

        let fire = table.find("Checkout crash").unwrap();
        let audit = table.find("Audit logging").unwrap();
        let docs = table.find("بهبود مستندات").unwrap();
        assert!(fire < audit && audit < docs);
    }

    #[test]
    fn test_titles_are_escaped_and_direction_aware() {
        let mut items = sample_items();
        items[1].title = "<script>alert('xss')</script>".to_string();
        let metrics = calculate_metrics(&items);
        let context = sample_context();
        let report = Report::new(&items, &metrics, &context);

        let mut buffer = Vec::new();
        HtmlWriter::new(&mut buffer).write_report(&report).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(!output.contains("<script>alert"));
        assert!(output.contains("&lt;script&gt;"));
        assert!(output.contains("<span dir=\"auto\">بهبود مستندات</span>"));
    }

    #[test]
    fn test_changes_section() {
        assert!(!render(ReportFormat::Html, None).contains("Changes Since Last Snapshot"));

        let diff = SnapshotDiff {
            items_completed: 1,
            items_added: 2,
            status_changes: vec![StatusChange {
                id: "3".into(),
                title: "Audit logging".into(),
                from_status: Status::InReview,
                to_status: Status::Done,
            }],
        };
        let output = render(ReportFormat::Html, Some(&diff));

        assert!(output.contains("Completed: 1 | Added: 2 | Status changes: 1"));
        assert!(output.contains("Audit logging</span>: In Review &rarr; Done"));
    }

    #[test]
    fn test_script_json_escapes_closing_tags() {
        let value = serde_json::json!({"label": "</script>"});
        assert_eq!(script_json(&value).unwrap(), r#"{"label":"<\/script>"}"#);
    }

    #[test]
    fn test_placeholder_in_title_is_not_expanded() {
        let mut items = sample_items();
        items[0].title = "{{{STATUS_CHART}}}".to_string();
        let metrics = calculate_metrics(&items);
        let context = ReportContext::new("{{{OWNER}}}", "acme", 2);
        let report = Report::new(&items, &metrics, &context);

        let mut buffer = Vec::new();
        HtmlWriter::new(&mut buffer).write_report(&report).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("&#123;&#123;&#123;STATUS_CHART}}}"));
        assert!(output.contains("<h1 dir=\"auto\">&#123;&#123;&#123;OWNER}}}</h1>"));
        assert_eq!(output.matches("\"status-chart\": {\"data\":").count(), 1);
    }
}
