//! Data source boundary.
//!
//! Sources return loosely-typed JSON records; turning them into [`Item`]s is
//! the parser's job, so a source never fails because of a weird field value.
//!
//! [`Item`]: crate::core::Item

pub mod gh_cli;
pub mod graphql;

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

use crate::core::errors::{Error, Result};

pub use gh_cli::GhCliSource;
pub use graphql::GraphQlSource;

/// Anything that can supply the project's title and raw item records.
pub trait ProjectSource {
    fn project_title(&self) -> Result<Option<String>>;
    fn fetch_items(&self) -> Result<Vec<Value>>;
}

/// Located `gh` executable.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: PathBuf,
}

impl GhCli {
    /// Find `gh` on `PATH`.
    pub fn locate() -> Result<Self> {
        let program = which::which("gh").map_err(|_| {
            Error::SourceUnavailable(
                "GitHub CLI (gh) is not installed. Please install from https://cli.github.com/"
                    .to_string(),
            )
        })?;
        log::debug!("Using gh at {}", program.display());
        Ok(Self { program })
    }

    /// Run `gh` with `args` and return its stdout.
    pub fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<S> = args.into_iter().collect();
        let rendered = args
            .iter()
            .map(|arg| arg.as_ref().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ");
        log::debug!("Running gh {}", rendered);

        let output = Command::new(&self.program).args(&args).output()?;
        if !output.status.success() {
            return Err(Error::source_command(
                format!("gh {rendered}"),
                String::from_utf8_lossy(&output.stderr).trim(),
            ));
        }
        String::from_utf8(output.stdout)
            .map_err(|e| Error::SourceResponse(format!("gh output is not UTF-8: {e}")))
    }

    /// `gh project view` title, shared by both sources.
    pub fn project_title(&self, owner: &str, project_number: u32) -> Result<Option<String>> {
        let number = project_number.to_string();
        let stdout = self.run([
            "project",
            "view",
            number.as_str(),
            "--owner",
            owner,
            "--format",
            "json",
        ])?;
        title_from_view(&stdout)
    }
}

pub(crate) fn parse_json(stdout: &str) -> Result<Value> {
    serde_json::from_str(stdout).map_err(|e| Error::SourceResponse(e.to_string()))
}

/// A blank title counts as absent.
pub fn title_from_view(stdout: &str) -> Result<Option<String>> {
    let view = parse_json(stdout)?;
    Ok(view
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_view() {
        let title = title_from_view(r#"{"number": 2, "title": "Sprint Board"}"#).unwrap();
        assert_eq!(title.as_deref(), Some("Sprint Board"));
    }

    #[test]
    fn test_missing_or_blank_title_is_none() {
        assert_eq!(title_from_view(r#"{"number": 2}"#).unwrap(), None);
        assert_eq!(title_from_view(r#"{"title": "  "}"#).unwrap(), None);
    }

    #[test]
    fn test_non_json_view_is_a_response_error() {
        let err = title_from_view("Not Found").unwrap_err();
        assert!(matches!(err, Error::SourceResponse(_)));
        assert!(err.is_source_error());
    }
}
