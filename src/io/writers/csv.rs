//! Spreadsheet export: one row per item.
//!
//! Output starts with a UTF-8 byte order mark so Excel picks the right
//! encoding for non-Latin titles.

use std::borrow::Cow;
use std::io::Write;

use super::{format_hours, join_or, Report, ReportWriter};
use crate::core::Item;

const BOM: &str = "\u{feff}";
const HEADER: [&str; 9] = [
    "Title",
    "Status",
    "Priority",
    "Assignees",
    "Estimate",
    "Labels",
    "URL",
    "Repository",
    "Issue Number",
];

pub struct CsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_row<'s>(&mut self, fields: impl IntoIterator<Item = Cow<'s, str>>) -> anyhow::Result<()> {
        let line = fields
            .into_iter()
            .map(|field| escape_field(&field).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        write!(self.writer, "{line}\r\n")?;
        Ok(())
    }
}

/// RFC 4180 quoting: fields with a comma, quote or line break are quoted and
/// inner quotes doubled.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn item_row(item: &Item) -> [Cow<'_, str>; 9] {
    [
        Cow::Borrowed(item.title.as_str()),
        Cow::Borrowed(item.status.label()),
        Cow::Borrowed(item.priority.label()),
        Cow::Owned(join_or(&item.assignees, "")),
        Cow::Owned(item.estimate_hours.map(format_hours).unwrap_or_default()),
        Cow::Owned(join_or(&item.labels, "")),
        Cow::Borrowed(item.url.as_str()),
        Cow::Borrowed(item.repository.as_str()),
        Cow::Owned(item.issue_number.map(|n| n.to_string()).unwrap_or_default()),
    ]
}

impl<W: Write> ReportWriter for CsvWriter<W> {
    fn write_report(&mut self, report: &Report<'_>) -> anyhow::Result<()> {
        self.writer.write_all(BOM.as_bytes())?;
        self.write_row(HEADER.map(Cow::Borrowed))?;
        for item in report.items {
            self.write_row(item_row(item))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
