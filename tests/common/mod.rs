//! Shared fixtures for integration tests.

use ghreport::fetch::ProjectSource;
use serde_json::{json, Value};

/// In-memory stand-in for the GitHub project.
pub struct FixtureSource {
    pub title: Option<String>,
    pub items: Vec<Value>,
}

impl FixtureSource {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            title: Some("Platform Roadmap".to_string()),
            items,
        }
    }
}

impl ProjectSource for FixtureSource {
    fn project_title(&self) -> ghreport::Result<Option<String>> {
        Ok(self.title.clone())
    }

    fn fetch_items(&self) -> ghreport::Result<Vec<Value>> {
        Ok(self.items.clone())
    }
}

pub fn raw_item(id: &str, title: &str, status: &str, priority: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "status": status,
        "priority": priority,
        "assignees": ["sara"],
        "labels": ["backend"],
        "estimate (Hrs)": 3,
        "content": {
            "url": format!("https://github.com/acme/api/issues/{id}"),
            "repository": "acme/api",
            "number": 1,
            "type": "Issue"
        }
    })
}

/// A small board: one fire, one done, one in progress, one garbled priority.
pub fn board() -> Vec<Value> {
    vec![
        raw_item("PVTI_1", "Login outage", "Todo", "P🔥"),
        raw_item("PVTI_2", "Rate limiter", "Done", "P0"),
        raw_item("PVTI_3", "Billing export", "In Progress", "P1"),
        raw_item("PVTI_4", "Cache warmup", "Backlog", "P≡ا¤ح"),
    ]
}
