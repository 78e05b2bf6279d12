use std::io::Write;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};

use super::{format_hours, Report, ReportWriter};
use crate::formatting::paint_tier;
use crate::metrics::{
    completion_tier, high_priority_tier, percentage, unplanned_done_tier, unplanned_tier,
    workload_tier, Tier,
};

/// Console summary with tables. Colour follows the global `colored` setting.
pub struct TerminalWriter<W: Write> {
    writer: W,
    use_color: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            use_color: colored::control::SHOULD_COLORIZE.should_colorize(),
        }
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    fn table(&self, header: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header.iter().map(|h| Cell::new(h)));
        if self.use_color {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
        table
    }

    fn tier_cell(&self, text: String, tier: Tier) -> Cell {
        let cell = Cell::new(text).set_alignment(CellAlignment::Right);
        if !self.use_color {
            return cell;
        }
        cell.fg(match tier {
            Tier::Green => Color::Green,
            Tier::Yellow => Color::Yellow,
            Tier::Red => Color::Red,
        })
    }

    fn paint(&self, text: &str, tier: Tier) -> String {
        if self.use_color {
            paint_tier(text, tier).to_string()
        } else {
            text.to_string()
        }
    }

    fn banner(&mut self, title: &str) -> anyhow::Result<()> {
        let rule = "═".repeat(50);
        if self.use_color {
            writeln!(self.writer, "{}", rule.blue())?;
            writeln!(self.writer, "    {}", title.bold())?;
            writeln!(self.writer, "{}", rule.blue())?;
        } else {
            writeln!(self.writer, "{rule}")?;
            writeln!(self.writer, "    {title}")?;
            writeln!(self.writer, "{rule}")?;
        }
        Ok(())
    }

    fn write_summary(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        let ctx = report.context;
        let m = report.metrics;

        self.banner(&format!("{} ({}#{})", ctx.project_name, ctx.owner, ctx.project_number))?;
        writeln!(
            self.writer,
            "Generated {}",
            ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;

        let rows = [
            ("Total items", m.total_items.to_string(), None),
            (
                "Total estimate (h)",
                format_hours(m.total_estimate_hours),
                None,
            ),
            (
                "Completion",
                format!("{:.1}%", m.completion_percentage),
                Some(completion_tier(m.completion_percentage)),
            ),
            (
                "Active completion",
                format!("{:.1}%", m.active_completion_percentage),
                Some(completion_tier(m.active_completion_percentage)),
            ),
            (
                "Unplanned",
                format!("{:.1}% ({})", m.unplanned_percentage, m.unplanned_count),
                Some(unplanned_tier(m.unplanned_percentage)),
            ),
            (
                "Unplanned share of done",
                format!("{:.1}%", m.unplanned_done_percentage),
                Some(unplanned_done_tier(m.unplanned_done_percentage)),
            ),
            (
                "High priority not started",
                m.high_priority_not_started.to_string(),
                Some(high_priority_tier(m.high_priority_not_started)),
            ),
        ];
        for (label, value, tier) in rows {
            let value = match tier {
                Some(tier) => self.paint(&value, tier),
                None => value,
            };
            writeln!(self.writer, "  {:<28}{}", label, value)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_changes(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        let Some(diff) = report.diff else {
            return Ok(());
        };
        writeln!(self.writer, "Changes since last snapshot:")?;
        writeln!(self.writer, "  Items completed: {}", diff.items_completed)?;
        writeln!(self.writer, "  Items added:     {}", diff.items_added)?;
        writeln!(self.writer, "  Status changes:  {}", diff.status_changes.len())?;
        for change in &diff.status_changes {
            writeln!(
                self.writer,
                "    {}: {} -> {}",
                change.title, change.from_status, change.to_status
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_distributions(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        let total = report.metrics.total_items;

        let mut status = self.table(&["Status", "Items", "Share"]);
        for (key, items) in &report.metrics.items_by_status {
            status.add_row(vec![
                Cell::new(key.label()),
                Cell::new(items.len()).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.1}%", percentage(items.len(), total)))
                    .set_alignment(CellAlignment::Right),
            ]);
        }
        writeln!(self.writer, "{status}")?;

        let mut priority = self.table(&["Priority", "Items", "Share"]);
        for (key, items) in &report.metrics.items_by_priority {
            priority.add_row(vec![
                Cell::new(key.label()),
                Cell::new(items.len()).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.1}%", percentage(items.len(), total)))
                    .set_alignment(CellAlignment::Right),
            ]);
        }
        writeln!(self.writer, "{priority}")?;
        Ok(())
    }

    fn write_workload(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        let workload = report.workload();
        if workload.is_empty() {
            return Ok(());
        }
        let mut table = self.table(&["Member", "Active items"]);
        for (member, count) in &workload {
            table.add_row(vec![
                Cell::new(member),
                self.tier_cell(count.to_string(), workload_tier(*count)),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        Ok(())
    }
}

impl<W: Write> ReportWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        self.write_summary(report)?;
        self.write_changes(report)?;
        self.write_distributions(report)?;
        self.write_workload(report)?;
        self.writer.flush()?;
        Ok(())
    }
}
