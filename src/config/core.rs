use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format for a generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Markdown,
    Json,
    Csv,
    Terminal,
}

impl ReportFormat {
    /// File extension used for default output paths.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Terminal => "txt",
        }
    }
}

/// Root configuration for ghreport.
///
/// Every field has a default, so a partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// GitHub user or organization owning the project
    pub owner: String,

    /// Project number as shown in the project URL
    pub project_number: u32,

    /// Format used when `--format` is not given
    pub default_format: ReportFormat,

    /// Where reports are written when `--output` is not given
    pub output_directory: PathBuf,

    /// Where snapshots are stored
    pub snapshot_directory: PathBuf,

    /// Maximum number of items requested from the project
    pub item_limit: u32,

    /// Assignees left out of the workload chart and table
    pub workload_exclusions: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            owner: "TechBurst-Pro".to_string(),
            project_number: 2,
            default_format: ReportFormat::Html,
            output_directory: PathBuf::from("reports"),
            snapshot_directory: PathBuf::from("snapshots"),
            item_limit: 100,
            workload_exclusions: Vec::new(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub owner: Option<String>,
    pub project_number: Option<u32>,
    pub format: Option<ReportFormat>,
    pub snapshot_directory: Option<PathBuf>,
}

impl ReportConfig {
    pub fn merge_with_args(self, overrides: &ConfigOverrides) -> Self {
        Self {
            owner: overrides.owner.clone().unwrap_or(self.owner),
            project_number: overrides.project_number.unwrap_or(self.project_number),
            default_format: overrides.format.unwrap_or(self.default_format),
            snapshot_directory: overrides
                .snapshot_directory
                .clone()
                .unwrap_or(self.snapshot_directory),
            ..self
        }
    }
}

/// Contents written by `ghreport init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ghreport configuration

# GitHub user or organization that owns the project
owner = "TechBurst-Pro"

# Project number from https://github.com/orgs/<owner>/projects/<number>
project_number = 2

# html, markdown, json, csv or terminal
default_format = "html"

output_directory = "reports"
snapshot_directory = "snapshots"

# Maximum number of project items to fetch
item_limit = 100

# Assignees left out of team workload figures
workload_exclusions = []
"#;
