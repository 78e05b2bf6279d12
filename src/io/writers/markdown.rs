use std::io::Write;

use super::{format_hours, join_or, Report, ReportWriter};
use crate::core::Item;
use crate::metrics::{
    completion_tier, high_priority_tier, percentage, unplanned_done_tier, unplanned_tier,
    workload_tier,
};

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_summary(report)?;
        self.write_changes(report)?;
        self.write_status_distribution(report)?;
        self.write_priority_distribution(report)?;
        self.write_workload(report)?;
        self.write_high_priority(report)?;
        self.write_items_by_status(report)?;
        self.write_item_table(report)?;
        Ok(())
    }
}

/// Escape characters that would break a table cell or link text.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn link(item: &Item) -> String {
    if item.url.is_empty() {
        cell(&item.title)
    } else {
        format!("[{}]({})", cell(&item.title).replace(']', "\\]"), item.url)
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        let ctx = report.context;
        writeln!(self.writer, "# Project Report: {}", ctx.project_name)?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "**Owner:** {} | **Project:** #{}",
            ctx.owner, ctx.project_number
        )?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "**Generated:** {}",
            ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        let m = report.metrics;
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "- **Total items:** {}", m.total_items)?;
        writeln!(
            self.writer,
            "- **Total estimate:** {} h",
            format_hours(m.total_estimate_hours)
        )?;
        writeln!(
            self.writer,
            "- **Completion:** {:.1}% {}",
            m.completion_percentage,
            completion_tier(m.completion_percentage).emoji()
        )?;
        writeln!(
            self.writer,
            "- **Active completion:** {:.1}% of {} active items {}",
            m.active_completion_percentage,
            m.active_items,
            completion_tier(m.active_completion_percentage).emoji()
        )?;
        writeln!(
            self.writer,
            "- **Unplanned:** {:.1}% ({} items) {}",
            m.unplanned_percentage,
            m.unplanned_count,
            unplanned_tier(m.unplanned_percentage).emoji()
        )?;
        writeln!(
            self.writer,
            "- **Unplanned share of done:** {:.1}% ({} items) {}",
            m.unplanned_done_percentage,
            m.unplanned_done_count,
            unplanned_done_tier(m.unplanned_done_percentage).emoji()
        )?;
        writeln!(
            self.writer,
            "- **High priority not started:** {} {}",
            m.high_priority_not_started,
            high_priority_tier(m.high_priority_not_started).emoji()
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_changes(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        let Some(diff) = report.diff else {
            return Ok(());
        };
        writeln!(self.writer, "## Changes Since Last Snapshot")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "- **Items completed:** {}", diff.items_completed)?;
        writeln!(self.writer, "- **Items added:** {}", diff.items_added)?;
        writeln!(self.writer, "- **Status changes:** {}", diff.status_changes.len())?;
        for change in &diff.status_changes {
            writeln!(
                self.writer,
                "  - {}: {} → {}",
                cell(&change.title),
                change.from_status,
                change.to_status
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_distribution_row(&mut self, label: &str, count: usize, total: usize) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "| {} | {} | {:.1}% |",
            label,
            count,
            percentage(count, total)
        )?;
        Ok(())
    }

    fn write_status_distribution(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        let total = report.metrics.total_items;
        writeln!(self.writer, "## Status Distribution")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Status | Count | Share |")?;
        writeln!(self.writer, "|--------|-------|-------|")?;
        for (status, items) in &report.metrics.items_by_status {
            self.write_distribution_row(status.label(), items.len(), total)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_priority_distribution(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        let total = report.metrics.total_items;
        writeln!(self.writer, "## Priority Distribution")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Priority | Count | Share |")?;
        writeln!(self.writer, "|----------|-------|-------|")?;
        for (priority, items) in &report.metrics.items_by_priority {
            self.write_distribution_row(priority.label(), items.len(), total)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_workload(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        let workload = report.workload();
        if workload.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Team Workload")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Member | Active items | |")?;
        writeln!(self.writer, "|--------|--------------|---|")?;
        for (member, count) in &workload {
            writeln!(
                self.writer,
                "| {} | {} | {} |",
                cell(member),
                count,
                workload_tier(*count).emoji()
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_high_priority(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        let items = report.high_priority_items();
        if items.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## High Priority Items (P🔥 and P0)")?;
        writeln!(self.writer)?;
        for item in items {
            writeln!(self.writer, "- **[{}]** {}", item.priority, link(item))?;
            writeln!(self.writer, "  - Status: {}", item.status)?;
            writeln!(
                self.writer,
                "  - Assignees: {}",
                join_or(&item.assignees, "Unassigned")
            )?;
            writeln!(
                self.writer,
                "  - Estimate: {}",
                item.estimate_hours
                    .map(|h| format!("{} h", format_hours(h)))
                    .unwrap_or_else(|| "-".to_string())
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_items_by_status(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        writeln!(self.writer, "## Items by Status")?;
        writeln!(self.writer)?;
        for (status, items) in &report.metrics.items_by_status {
            writeln!(self.writer, "### {} ({})", status, items.len())?;
            writeln!(self.writer)?;
            for item in items {
                writeln!(
                    self.writer,
                    "- **[{}]** {} - {}",
                    item.priority,
                    link(item),
                    join_or(&item.assignees, "Unassigned")
                )?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_item_table(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        writeln!(self.writer, "## All Items")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Title | Status | Priority | Assignees | Estimate | Labels |"
        )?;
        writeln!(
            self.writer,
            "|-------|--------|----------|-----------|----------|--------|"
        )?;
        for item in report.items {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {} |",
                link(item),
                item.status,
                item.priority,
                cell(&join_or(&item.assignees, "-")),
                item.estimate_hours.map(format_hours).unwrap_or_else(|| "-".to_string()),
                cell(&join_or(&item.labels, "-")),
            )?;
        }
        Ok(())
    }
}
