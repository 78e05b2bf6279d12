//! Plotly figure specs for the HTML report.
//!
//! Each builder returns a `{data, layout}` JSON value that the page passes
//! straight to `Plotly.newPlot`.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::core::{Priority, Status};
use crate::metrics::{workload_tier, Tier};

const FALLBACK_COLOR: &str = "#6b7280";
const PLANNED_COLOR: &str = "#22c55e";
const UNPLANNED_COLOR: &str = "#ef4444";

pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::Fire => "#ef4444",
        Priority::P0 => "#f97316",
        Priority::P1 => "#eab308",
        Priority::P2 => "#3b82f6",
    }
}

/// Colour for a priority label; labels outside the known set are grey.
pub fn priority_label_color(label: &str) -> &'static str {
    Priority::from_label(label)
        .map(priority_color)
        .unwrap_or(FALLBACK_COLOR)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBuilder {
    font_family: String,
    font_size: u32,
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self {
            font_family: "Vazirmatn, Segoe UI, sans-serif".to_string(),
            font_size: 14,
        }
    }
}

impl ChartBuilder {
    pub fn new(font_family: impl Into<String>, font_size: u32) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
        }
    }

    fn font(&self) -> Value {
        json!({"family": self.font_family, "size": self.font_size})
    }

    fn layout(&self, title: &str) -> Value {
        json!({
            "title": {"text": title, "font": self.font()},
            "font": self.font(),
        })
    }

    fn axis_layout(&self, title: &str, x_title: &str, y_title: &str) -> Value {
        let mut layout = self.layout(title);
        layout["xaxis"] = json!({"title": {"text": x_title}});
        layout["yaxis"] = json!({"title": {"text": y_title}, "automargin": true});
        layout
    }

    pub fn status_pie(&self, counts: &BTreeMap<Status, usize>) -> Value {
        let mut layout = self.layout("Status Distribution");
        layout["showlegend"] = json!(true);
        json!({
            "data": [{
                "type": "pie",
                "labels": counts.keys().map(Status::label).collect::<Vec<_>>(),
                "values": counts.values().collect::<Vec<_>>(),
                "textinfo": "label+percent",
                "hoverinfo": "label+value+percent",
                "direction": "clockwise",
            }],
            "layout": layout,
        })
    }

    pub fn status_bar(&self, counts: &BTreeMap<Status, usize>) -> Value {
        json!({
            "data": [{
                "type": "bar",
                "x": counts.keys().map(Status::label).collect::<Vec<_>>(),
                "y": counts.values().collect::<Vec<_>>(),
                "hoverinfo": "x+y",
            }],
            "layout": self.axis_layout("Status Distribution", "Status", "Items"),
        })
    }

    /// Horizontal bars, one colour per priority level.
    pub fn priority_bar(&self, counts: &BTreeMap<Priority, usize>) -> Value {
        json!({
            "data": [{
                "type": "bar",
                "orientation": "h",
                "y": counts.keys().map(Priority::label).collect::<Vec<_>>(),
                "x": counts.values().collect::<Vec<_>>(),
                "marker": {
                    "color": counts.keys().map(|p| priority_color(*p)).collect::<Vec<_>>(),
                },
                "hoverinfo": "y+x",
            }],
            "layout": self.axis_layout("Priority Distribution", "Items", "Priority"),
        })
    }

    pub fn planned_vs_unplanned(&self, planned: usize, unplanned: usize) -> Value {
        let mut layout = self.layout("Planned vs Unplanned");
        layout["showlegend"] = json!(true);
        json!({
            "data": [{
                "type": "pie",
                "labels": ["Planned", "Unplanned"],
                "values": [planned, unplanned],
                "marker": {"colors": [PLANNED_COLOR, UNPLANNED_COLOR]},
                "textinfo": "label+percent",
                "hoverinfo": "label+value+percent",
            }],
            "layout": layout,
        })
    }

    /// Active items per person, each bar coloured by its workload tier.
    pub fn team_workload(&self, workload: &BTreeMap<String, usize>) -> Value {
        let colors: Vec<&str> = workload
            .values()
            .map(|count| workload_tier(*count))
            .map(|tier: Tier| tier.hex())
            .collect();

        json!({
            "data": [{
                "type": "bar",
                "orientation": "h",
                "y": workload.keys().collect::<Vec<_>>(),
                "x": workload.values().collect::<Vec<_>>(),
                "marker": {"color": colors},
                "hoverinfo": "y+x",
            }],
            "layout": self.axis_layout("Team Workload", "Active items", "Team member"),
        })
    }
}
