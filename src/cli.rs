use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{ReportFormat, DEFAULT_CONFIG_FILE};
use crate::metrics::DateField;

#[derive(Parser, Debug)]
#[command(name = "ghreport")]
#[command(about = "Status reports and run-over-run diffs for GitHub Projects", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v: info, -vv: debug). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Disable colors and emoji
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the project, save a snapshot and render a report
    Report {
        /// Output format (defaults to the config file's default_format)
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,

        /// Output file (defaults to <output_directory>/report-<timestamp>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// GitHub organization or user
        #[arg(long)]
        owner: Option<String>,

        /// Project number
        #[arg(long = "project")]
        project_number: Option<u32>,

        /// Configuration file (TOML, or JSON when the extension is .json)
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Do not save a snapshot or compare against the previous one
        #[arg(long)]
        no_snapshot: bool,

        /// Snapshot directory (overrides the config file)
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,

        /// Fetch through GraphQL to get item timestamps
        #[arg(long)]
        timestamps: bool,

        /// Only include items whose date field is on or after this date
        /// (YYYY-MM-DD or RFC 3339)
        #[arg(long, requires = "timestamps")]
        since: Option<String>,

        /// Only include items whose date field is on or before this date
        #[arg(long, requires = "timestamps")]
        until: Option<String>,

        /// Timestamp used by --since/--until
        #[arg(long, value_enum, default_value_t = DateField::IssueCreated)]
        date_field: DateField,
    },

    /// Compare two snapshots
    Diff {
        /// Snapshot directory; the two latest snapshots are compared
        #[arg(long, default_value = "snapshots", conflicts_with_all = ["before", "after"])]
        dir: PathBuf,

        /// Older snapshot file
        #[arg(long, requires = "after")]
        before: Option<PathBuf>,

        /// Newer snapshot file
        #[arg(long, requires = "before")]
        after: Option<PathBuf>,

        /// Print the diff as terminal text or JSON
        #[arg(short, long, value_enum, default_value_t = DiffFormat::Terminal)]
        format: DiffFormat,
    },

    /// Write a default ghreport.toml
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DiffFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_report_command() {
        let args = vec![
            "ghreport",
            "report",
            "--format",
            "markdown",
            "--owner",
            "acme",
            "--project",
            "5",
            "--no-snapshot",
        ];

        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Report {
                format,
                owner,
                project_number,
                no_snapshot,
                config,
                date_field,
                ..
            } => {
                assert_eq!(format, Some(ReportFormat::Markdown));
                assert_eq!(owner.as_deref(), Some("acme"));
                assert_eq!(project_number, Some(5));
                assert!(no_snapshot);
                assert_eq!(config, PathBuf::from("ghreport.toml"));
                assert_eq!(date_field, DateField::IssueCreated);
            }
            _ => panic!("Expected Report command"),
        }
    }

    #[test]
    fn test_date_bounds_require_timestamps() {
        let result = Cli::try_parse_from(["ghreport", "report", "--since", "2025-01-01"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "ghreport",
            "report",
            "--timestamps",
            "--since",
            "2025-01-01",
            "--date-field",
            "issue-closed",
        ])
        .unwrap();
        match cli.command {
            Commands::Report { since, date_field, .. } => {
                assert_eq!(since.as_deref(), Some("2025-01-01"));
                assert_eq!(date_field, DateField::IssueClosed);
            }
            _ => panic!("Expected Report command"),
        }
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        assert!(Cli::try_parse_from(["ghreport", "report", "--format", "pdf"]).is_err());
    }

    #[test]
    fn test_cli_parsing_diff_with_files() {
        let cli = Cli::parse_from([
            "ghreport", "diff", "--before", "a.json", "--after", "b.json", "--format", "json",
        ]);
        match cli.command {
            Commands::Diff { before, after, format, .. } => {
                assert_eq!(before, Some(PathBuf::from("a.json")));
                assert_eq!(after, Some(PathBuf::from("b.json")));
                assert_eq!(format, DiffFormat::Json);
            }
            _ => panic!("Expected Diff command"),
        }
    }

    #[test]
    fn test_diff_needs_both_files() {
        assert!(Cli::try_parse_from(["ghreport", "diff", "--before", "a.json"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["ghreport", "init", "--force", "-vv", "--plain"]);
        assert_eq!(cli.verbosity, 2);
        assert!(cli.plain);
        match cli.command {
            Commands::Init { force } => assert!(force),
            _ => panic!("Expected Init command"),
        }
    }
}
