pub mod calculator;
pub mod filter;
pub mod grouping;
pub mod thresholds;

pub use calculator::{calculate_metrics, calculate_metrics_in_range, percentage, ProjectMetrics};
pub use filter::{filter_by_date_range, DateField, DateRange};
pub use grouping::{group_by_assignee, group_by_priority, group_by_status, group_counts, UNASSIGNED};
pub use thresholds::{
    completion_tier, high_priority_tier, unplanned_done_tier, unplanned_tier, workload_tier, Tier,
    WorkloadPolicy,
};
