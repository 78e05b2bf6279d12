use anyhow::Result;
use clap::Parser;
use ghreport::cli::{Cli, Commands};
use ghreport::commands::{self, DiffConfig, DiffTarget, ReportOptions};
use ghreport::core::Error;
use ghreport::formatting::{FormattingConfig, Progress};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    let formatting = create_formatting_config(cli.plain);
    formatting.apply();
    let progress = Progress::new(formatting);

    if let Err(e) = run(cli.command, &progress) {
        eprintln!("❌ Error: {e:#}");
        if let Some(hint) = error_hint(&e) {
            eprintln!("   {hint}");
        }
        std::process::exit(1);
    }
}

fn run(command: Commands, progress: &Progress) -> Result<()> {
    match command {
        Commands::Report {
            format,
            output,
            owner,
            project_number,
            config,
            no_snapshot,
            snapshot_dir,
            timestamps,
            since,
            until,
            date_field,
        } => {
            let options = ReportOptions {
                format,
                output,
                owner,
                project_number,
                config_path: config,
                no_snapshot,
                snapshot_dir,
                timestamps,
                since,
                until,
                date_field,
            };
            commands::handle_report(options, progress)?;
            Ok(())
        }
        Commands::Diff {
            dir,
            before,
            after,
            format,
        } => {
            let target = match (before, after) {
                (Some(before), Some(after)) => DiffTarget::Files { before, after },
                _ => DiffTarget::Latest(dir),
            };
            commands::handle_diff(DiffConfig { target, format }, progress)
        }
        Commands::Init { force } => commands::init_config(force),
    }
}

// RUST_LOG wins over -v
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

// Pure function to create formatting configuration
fn create_formatting_config(plain: bool) -> FormattingConfig {
    if plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    }
}

fn error_hint(error: &anyhow::Error) -> Option<&'static str> {
    let error = error.chain().find_map(|cause| cause.downcast_ref::<Error>())?;
    match error {
        e if e.is_source_error() => Some(
            "Make sure the GitHub CLI is installed (https://cli.github.com) and authenticated: gh auth login --scopes project",
        ),
        Error::Config(_) => Some("Check ghreport.toml, or run `ghreport init` to create one."),
        Error::CorruptSnapshot { .. } => {
            Some("Move the corrupt file out of the snapshot directory and run again.")
        }
        _ => None,
    }
}
