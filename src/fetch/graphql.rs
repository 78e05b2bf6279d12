//! ProjectV2 GraphQL source.
//!
//! Slower than `gh project item-list` but reports when the project item and
//! its issue were created, updated and closed. Each node is reshaped into the
//! same record layout the item-list source produces, plus the timestamp keys.

use serde_json::{json, Map, Value};

use super::{parse_json, GhCli, ProjectSource};
use crate::core::errors::{Error, Result};
use crate::core::parsing::ESTIMATE_FIELD;

pub const PROJECT_ITEMS_QUERY: &str = r#"
query($owner: String!, $number: Int!, $limit: Int!) {
  organization(login: $owner) {
    projectV2(number: $number) {
      items(first: $limit) {
        nodes {
          id
          createdAt
          updatedAt
          fieldValues(first: 20) {
            nodes {
              ... on ProjectV2ItemFieldSingleSelectValue {
                name
                field { ... on ProjectV2SingleSelectField { name } }
              }
              ... on ProjectV2ItemFieldNumberValue {
                number
                field { ... on ProjectV2Field { name } }
              }
            }
          }
          content {
            ... on Issue {
              number
              title
              url
              repository { nameWithOwner }
              createdAt
              updatedAt
              closedAt
              assignees(first: 10) { nodes { login } }
              labels(first: 10) { nodes { name } }
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Clone)]
pub struct GraphQlSource {
    gh: GhCli,
    owner: String,
    project_number: u32,
    limit: u32,
}

impl GraphQlSource {
    pub fn new(gh: GhCli, owner: impl Into<String>, project_number: u32, limit: u32) -> Self {
        Self {
            gh,
            owner: owner.into(),
            project_number,
            limit,
        }
    }
}

impl ProjectSource for GraphQlSource {
    fn project_title(&self) -> Result<Option<String>> {
        self.gh.project_title(&self.owner, self.project_number)
    }

    fn fetch_items(&self) -> Result<Vec<Value>> {
        let stdout = self.gh.run([
            "api".to_string(),
            "graphql".to_string(),
            "-f".to_string(),
            format!("query={PROJECT_ITEMS_QUERY}"),
            "-F".to_string(),
            format!("owner={}", self.owner),
            "-F".to_string(),
            format!("number={}", self.project_number),
            "-F".to_string(),
            format!("limit={}", self.limit),
        ])?;
        let response = parse_json(&stdout)?;
        if let Some(errors) = response.get("errors") {
            return Err(Error::SourceResponse(format!("GraphQL errors: {errors}")));
        }
        Ok(transform_response(&response))
    }
}

fn path<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.get(*key))
}

fn logins(connection: Option<&Value>, key: &str) -> Vec<Value> {
    connection
        .and_then(|c| c.get("nodes"))
        .and_then(Value::as_array)
        .map(|nodes| {
            nodes
                .iter()
                .filter_map(|node| node.get(key).cloned())
                .collect()
        })
        .unwrap_or_default()
}

/// Project field name to value for single-select and number fields.
fn field_values(node: &Value) -> Map<String, Value> {
    let Some(values) = path(node, &["fieldValues", "nodes"]).and_then(Value::as_array) else {
        return Map::new();
    };

    values
        .iter()
        .filter_map(|value| {
            let field_name = path(value, &["field", "name"])
                .and_then(Value::as_str)
                .unwrap_or_default();
            let field_value = value.get("name").or_else(|| value.get("number"))?;
            Some((field_name.to_string(), field_value.clone()))
        })
        .collect()
}

fn null_or(value: Option<&Value>) -> Value {
    value.cloned().unwrap_or(Value::Null)
}

/// One raw record, or `None` for nodes without issue content (draft items
/// and pull requests come back empty).
pub fn transform_node(node: &Value) -> Option<Value> {
    let content = node.get("content").filter(|content| {
        content
            .as_object()
            .is_some_and(|fields| !fields.is_empty())
    })?;

    let fields = field_values(node);
    let repository = path(content, &["repository", "nameWithOwner"])
        .cloned()
        .unwrap_or_else(|| json!(""));
    let title = content.get("title").cloned().unwrap_or_else(|| json!(""));

    Some(json!({
        "id": null_or(node.get("id")),
        "title": title,
        "status": fields.get("Status").cloned().unwrap_or_else(|| json!("Backlog")),
        "priority": fields.get("Priority").cloned().unwrap_or_else(|| json!("P2")),
        ESTIMATE_FIELD: null_or(fields.get(ESTIMATE_FIELD)),
        "labels": logins(content.get("labels"), "name"),
        "assignees": logins(content.get("assignees"), "login"),
        "repository": repository,
        "content": {
            "number": null_or(content.get("number")),
            "title": title,
            "url": content.get("url").cloned().unwrap_or_else(|| json!("")),
            "repository": repository,
            "type": "Issue",
        },
        "project_created_at": null_or(node.get("createdAt")),
        "project_updated_at": null_or(node.get("updatedAt")),
        "issue_created_at": null_or(content.get("createdAt")),
        "issue_updated_at": null_or(content.get("updatedAt")),
        "issue_closed_at": null_or(content.get("closedAt")),
    }))
}

/// Raw records for every item node that carries content.
pub fn transform_response(response: &Value) -> Vec<Value> {
    let nodes = path(
        response,
        &["data", "organization", "projectV2", "items", "nodes"],
    )
    .and_then(Value::as_array);

    let Some(nodes) = nodes else {
        log::warn!("GraphQL response has no project items");
        return Vec::new();
    };

    let records: Vec<Value> = nodes.iter().filter_map(transform_node).collect();
    log::debug!(
        "Transformed {} of {} GraphQL nodes",
        records.len(),
        nodes.len()
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parsing::parse_items;
    use crate::core::{Priority, Status};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    const RESPONSE: &str = indoc! {r#"
        {
          "data": {
            "organization": {
              "projectV2": {
                "items": {
                  "nodes": [
                    {
                      "id": "PVTI_1",
                      "createdAt": "2025-01-02T08:00:00Z",
                      "updatedAt": "2025-01-10T09:30:00Z",
                      "fieldValues": {
                        "nodes": [
                          {},
                          {"name": "In Progress", "field": {"name": "Status"}},
                          {"name": "P🔥", "field": {"name": "Priority"}},
                          {"number": 5, "field": {"name": "estimate (Hrs)"}}
                        ]
                      },
                      "content": {
                        "number": 42,
                        "title": "Fix checkout",
                        "url": "https://github.com/acme/shop/issues/42",
                        "repository": {"nameWithOwner": "acme/shop"},
                        "createdAt": "2025-01-01T12:00:00Z",
                        "updatedAt": "2025-01-10T09:00:00Z",
                        "closedAt": null,
                        "assignees": {"nodes": [{"login": "ana"}, {"login": "bo"}]},
                        "labels": {"nodes": [{"name": "bug"}]}
                      }
                    },
                    {
                      "id": "PVTI_2",
                      "createdAt": "2025-01-03T08:00:00Z",
                      "updatedAt": "2025-01-03T08:00:00Z",
                      "fieldValues": {"nodes": []},
                      "content": {}
                    },
                    {
                      "id": "PVTI_3",
                      "createdAt": "2025-01-04T08:00:00Z",
                      "updatedAt": "2025-01-04T08:00:00Z",
                      "fieldValues": {"nodes": []},
                      "content": {
                        "number": 7,
                        "title": "Docs",
                        "url": "https://github.com/acme/shop/issues/7",
                        "repository": {"nameWithOwner": "acme/shop"},
                        "createdAt": "2025-01-04T07:00:00Z",
                        "updatedAt": "2025-01-05T07:00:00Z",
                        "closedAt": "2025-01-05T07:00:00Z",
                        "assignees": {"nodes": []},
                        "labels": {"nodes": []}
                      }
                    }
                  ]
                }
              }
            }
          }
        }
    "#};

    fn response() -> Value {
        serde_json::from_str(RESPONSE).unwrap()
    }

    #[test]
    fn test_nodes_without_content_are_skipped() {
        let records = transform_response(&response());
        let ids: Vec<_> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["PVTI_1", "PVTI_3"]);
    }

    #[test]
    fn test_field_values_and_content_are_mapped() {
        let records = transform_response(&response());
        let first = &records[0];

        assert_eq!(first["status"], "In Progress");
        assert_eq!(first["priority"], "P🔥");
        assert_eq!(first["estimate (Hrs)"], 5);
        assert_eq!(first["assignees"], json!(["ana", "bo"]));
        assert_eq!(first["labels"], json!(["bug"]));
        assert_eq!(first["content"]["number"], 42);
        assert_eq!(first["content"]["repository"], "acme/shop");
        assert_eq!(first["issue_created_at"], "2025-01-01T12:00:00Z");
        assert_eq!(first["issue_closed_at"], Value::Null);
    }

    #[test]
    fn test_missing_fields_default_to_backlog_and_p2() {
        let records = transform_response(&response());
        assert_eq!(records[1]["status"], "Backlog");
        assert_eq!(records[1]["priority"], "P2");
        assert_eq!(records[1]["estimate (Hrs)"], Value::Null);
    }

    #[test]
    fn test_records_parse_into_items_with_timestamps() {
        let items = parse_items(&transform_response(&response()));

        assert_eq!(items[0].status, Status::InProgress);
        assert_eq!(items[0].priority, Priority::Fire);
        assert_eq!(items[0].estimate_hours, Some(5.0));
        assert_eq!(items[0].issue_number, Some(42));
        assert_eq!(items[0].repository, "acme/shop");
        assert!(items[0].timestamps.project_created_at.is_some());
        assert!(items[0].timestamps.issue_closed_at.is_none());
        assert!(items[1].timestamps.issue_closed_at.is_some());
    }

    #[test]
    fn test_response_without_project_is_empty() {
        let response = json!({"data": {"organization": null}});
        assert!(transform_response(&response).is_empty());
    }
}
