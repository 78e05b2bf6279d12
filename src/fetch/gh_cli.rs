use serde_json::Value;

use super::{parse_json, GhCli, ProjectSource};
use crate::core::errors::{Error, Result};

/// Items from `gh project item-list`. No timestamps.
#[derive(Debug, Clone)]
pub struct GhCliSource {
    gh: GhCli,
    owner: String,
    project_number: u32,
    limit: u32,
}

impl GhCliSource {
    pub fn new(gh: GhCli, owner: impl Into<String>, project_number: u32, limit: u32) -> Self {
        Self {
            gh,
            owner: owner.into(),
            project_number,
            limit,
        }
    }
}

impl ProjectSource for GhCliSource {
    fn project_title(&self) -> Result<Option<String>> {
        self.gh.project_title(&self.owner, self.project_number)
    }

    fn fetch_items(&self) -> Result<Vec<Value>> {
        let number = self.project_number.to_string();
        let limit = self.limit.to_string();
        let stdout = self.gh.run([
            "project",
            "item-list",
            number.as_str(),
            "--owner",
            self.owner.as_str(),
            "--format",
            "json",
            "--limit",
            limit.as_str(),
        ])?;
        items_from_list(&stdout)
    }
}

/// The `items` array of an item-list response; a response without one has no
/// items.
pub fn items_from_list(stdout: &str) -> Result<Vec<Value>> {
    match parse_json(stdout)? {
        Value::Object(mut response) => match response.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(Error::SourceResponse(format!(
                "expected an items array, found {other}"
            ))),
            None => Ok(Vec::new()),
        },
        other => Err(Error::SourceResponse(format!(
            "expected a JSON object, found {other}"
        ))),
    }
}
