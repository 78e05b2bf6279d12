//! `ghreport report`: fetch, parse, aggregate, snapshot, render.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use crate::config::{
    load_config, validate_config_result, ConfigOverrides, ReportConfig, ReportFormat,
};
use crate::core::{parse_items, Item};
use crate::fetch::{GhCli, GhCliSource, GraphQlSource, ProjectSource};
use crate::formatting::Progress;
use crate::io::writers::{create_writer, Report, ReportContext, ReportWriter, TerminalWriter};
use crate::io::{default_output_path, ensure_dir};
use crate::metrics::{
    calculate_metrics, filter_by_date_range, DateField, DateRange, ProjectMetrics, WorkloadPolicy,
};
use crate::snapshot::{compare_snapshots, SnapshotDiff, SnapshotStore};

/// Command-line inputs of one report run.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub format: Option<ReportFormat>,
    pub output: Option<PathBuf>,
    pub owner: Option<String>,
    pub project_number: Option<u32>,
    pub config_path: PathBuf,
    pub no_snapshot: bool,
    pub snapshot_dir: Option<PathBuf>,
    pub timestamps: bool,
    pub since: Option<String>,
    pub until: Option<String>,
    pub date_field: DateField,
}

impl ReportOptions {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            owner: self.owner.clone(),
            project_number: self.project_number,
            format: self.format,
            snapshot_directory: self.snapshot_dir.clone(),
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// `None` when the report went to stdout
    pub output: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub items: Vec<Item>,
    pub metrics: ProjectMetrics,
    pub diff: Option<SnapshotDiff>,
}

/// Load, merge and validate configuration for a run.
pub fn resolve_config(options: &ReportOptions) -> Result<ReportConfig> {
    let config = load_config(&options.config_path).merge_with_args(&options.overrides());
    validate_config_result(&config)?;
    Ok(config)
}

/// Entry point used by the binary: talks to GitHub through `gh`.
pub fn handle_report(options: ReportOptions, progress: &Progress) -> Result<ReportOutcome> {
    progress.step("📋", "Loading configuration...");
    let config = resolve_config(&options)?;

    let gh = GhCli::locate()?;
    let source: Box<dyn ProjectSource> = if options.timestamps {
        Box::new(GraphQlSource::new(
            gh,
            config.owner.clone(),
            config.project_number,
            config.item_limit,
        ))
    } else {
        Box::new(GhCliSource::new(
            gh,
            config.owner.clone(),
            config.project_number,
            config.item_limit,
        ))
    };

    generate_report(&config, &options, source.as_ref(), progress)
}

/// The pipeline behind `report`, for any [`ProjectSource`].
///
/// Nothing is written until the fetch has succeeded.
pub fn generate_report(
    config: &ReportConfig,
    options: &ReportOptions,
    source: &dyn ProjectSource,
    progress: &Progress,
) -> Result<ReportOutcome> {
    let range = DateRange::parse(
        options.since.as_deref(),
        options.until.as_deref(),
        options.date_field,
    )?;
    let format = config.default_format;

    progress.step("🔍", "Fetching project data from GitHub...");
    progress.detail(&format!("Owner: {}", config.owner));
    progress.detail(&format!("Project: #{}", config.project_number));
    let project_name = source
        .project_title()?
        .unwrap_or_else(|| format!("Project {}", config.project_number));
    let raw_items = source.fetch_items()?;
    progress.detail(&format!("Found {} items", raw_items.len()));

    progress.step("⚙️ ", "Processing data...");
    let all_items = parse_items(&raw_items);
    let items = if range.is_unbounded() {
        all_items.clone()
    } else {
        let kept = filter_by_date_range(&all_items, &range);
        progress.detail(&format!(
            "{} of {} items inside the date range",
            kept.len(),
            all_items.len()
        ));
        kept
    };
    let metrics = calculate_metrics(&items);
    progress.detail(&format!("Total items: {}", metrics.total_items));
    progress.detail(&format!("Completion: {:.1}%", metrics.completion_percentage));
    progress.detail(&format!("Unplanned: {:.1}%", metrics.unplanned_percentage));

    let (snapshot, diff) = if options.no_snapshot {
        (None, None)
    } else {
        snapshot_and_compare(&config.snapshot_directory, &all_items, progress)?
    };

    progress.step("📝", &format!("Generating {:?} report...", format));
    let context = ReportContext::new(project_name, config.owner.clone(), config.project_number)
        .with_workload_policy(WorkloadPolicy::new(config.workload_exclusions.iter().cloned()));
    let report = Report::new(&items, &metrics, &context).with_diff(diff.as_ref());

    let output = match (&options.output, format) {
        (None, ReportFormat::Terminal) => {
            let stdout = std::io::stdout();
            create_writer(format, stdout.lock()).write_report(&report)?;
            None
        }
        (Some(path), _) => Some(write_report_file(path, format, &report)?),
        (None, _) => {
            let path = default_output_path(&config.output_directory, format, Utc::now());
            Some(write_report_file(&path, format, &report)?)
        }
    };

    if let Some(path) = &output {
        progress.success("Report generated successfully!");
        progress.detail(&format!("Output: {}", path.display()));
    }

    Ok(ReportOutcome {
        output,
        snapshot,
        items,
        metrics,
        diff,
    })
}

/// Save the current items, then diff against the snapshot that was latest
/// before this save.
fn snapshot_and_compare(
    dir: &Path,
    items: &[Item],
    progress: &Progress,
) -> Result<(Option<PathBuf>, Option<SnapshotDiff>)> {
    progress.step("💾", "Saving snapshot...");
    let store = SnapshotStore::new(dir);
    let path = store
        .save(items)
        .with_context(|| format!("Failed to save snapshot in {}", dir.display()))?;
    progress.detail(&format!("Saved to: {}", path.display()));

    let Some(previous) = store.load_previous()? else {
        log::info!("No earlier snapshot in {}; skipping comparison", dir.display());
        return Ok((Some(path), None));
    };

    let diff = compare_snapshots(items, Some(previous.as_slice()));
    progress.detail("Changes since last snapshot:");
    progress.detail(&format!("   Items completed: {}", diff.items_completed));
    progress.detail(&format!("   Items added: {}", diff.items_added));
    progress.detail(&format!("   Status changes: {}", diff.status_changes.len()));
    Ok((Some(path), Some(diff)))
}

fn write_report_file(path: &Path, format: ReportFormat, report: &Report<'_>) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    // no escape codes in files
    let mut buffer = Vec::new();
    match format {
        ReportFormat::Terminal => TerminalWriter::new(&mut buffer)
            .with_color(false)
            .write_report(report)?,
        _ => create_writer(format, &mut buffer).write_report(report)?,
    }

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    file.write_all(&buffer)
        .with_context(|| format!("Failed to write report file {}", path.display()))?;
    log::info!("Wrote {} bytes to {}", buffer.len(), path.display());
    Ok(path.to_path_buf())
}
