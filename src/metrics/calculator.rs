//! Project metrics reducer.
//!
//! Every value is recomputed from the full item slice on each call; nothing is
//! updated incrementally and nothing depends on call order.

use super::filter::{filter_by_date_range, DateRange};
use super::grouping::{
    group_by_assignee, group_by_priority, group_by_status, AssigneeGroups, PriorityGroups,
    StatusGroups,
};
use crate::core::{Item, Priority, Status};

/// Aggregate statistics for one item collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectMetrics {
    pub total_items: usize,
    pub total_estimate_hours: f64,
    pub completion_percentage: f64,
    pub planned_count: usize,
    pub unplanned_count: usize,
    pub unplanned_percentage: f64,
    pub high_priority_not_started: usize,
    pub items_by_status: StatusGroups,
    pub items_by_priority: PriorityGroups,
    pub items_by_assignee: AssigneeGroups,

    // Active work: everything except Backlog
    pub active_items: usize,
    pub active_completion_percentage: f64,
    pub active_unplanned_count: usize,
    pub active_unplanned_percentage: f64,
    pub pending_items: usize,
    pub in_progress_items: usize,

    pub todo_items: usize,
    pub done_active_items: usize,
    /// Share of Done items that were Fire
    pub unplanned_done_percentage: f64,
    pub unplanned_done_count: usize,
}

/// `part / whole` as a percentage rounded to one decimal; 0.0 for an empty whole.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_one_decimal(part as f64 / whole as f64 * 100.0)
}

/// Ties go to the even digit, so 6.25 becomes 6.2.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

fn count_where(items: &[Item], predicate: impl Fn(&Item) -> bool) -> usize {
    items.iter().filter(|&item| predicate(item)).count()
}

pub fn calculate_metrics(items: &[Item]) -> ProjectMetrics {
    if items.is_empty() {
        return ProjectMetrics::default();
    }

    let total_items = items.len();
    let done_items = count_where(items, Item::is_done);
    let unplanned_count = count_where(items, |item| !item.is_planned());

    let active: Vec<Item> = items
        .iter()
        .filter(|item| item.status != Status::Backlog)
        .cloned()
        .collect();
    let active_done = count_where(&active, Item::is_done);
    let active_unplanned_count = count_where(&active, |item| !item.is_planned());

    let (unplanned_done_percentage, unplanned_done_count) = calculate_unplanned_done_stats(items);

    ProjectMetrics {
        total_items,
        total_estimate_hours: total_estimate_hours(items),
        completion_percentage: percentage(done_items, total_items),
        planned_count: total_items - unplanned_count,
        unplanned_count,
        unplanned_percentage: percentage(unplanned_count, total_items),
        high_priority_not_started: count_high_priority_not_started(items),
        items_by_status: group_by_status(items),
        items_by_priority: group_by_priority(items),
        items_by_assignee: group_by_assignee(items),
        active_items: active.len(),
        active_completion_percentage: percentage(active_done, active.len()),
        active_unplanned_count,
        active_unplanned_percentage: percentage(active_unplanned_count, active.len()),
        pending_items: count_where(items, |item| item.status == Status::Pending),
        in_progress_items: count_where(items, |item| item.status == Status::InProgress),
        todo_items: count_where(items, |item| item.status == Status::Todo),
        done_active_items: done_items,
        unplanned_done_percentage,
        unplanned_done_count,
    }
}

/// Metrics over the items that fall inside `range`.
pub fn calculate_metrics_in_range(items: &[Item], range: &DateRange) -> ProjectMetrics {
    if range.is_unbounded() {
        return calculate_metrics(items);
    }
    let filtered = filter_by_date_range(items, range);
    log::debug!(
        "Date range on {:?} kept {} of {} items",
        range.field,
        filtered.len(),
        items.len()
    );
    calculate_metrics(&filtered)
}

/// Absent estimates contribute nothing.
pub fn total_estimate_hours(items: &[Item]) -> f64 {
    items.iter().filter_map(|item| item.estimate_hours).sum()
}

/// Fire or P0 items that are still in Backlog or Todo.
pub fn count_high_priority_not_started(items: &[Item]) -> usize {
    count_where(items, |item| item.priority.is_high() && item.status.is_not_started())
}

/// Percentage and count of Done items that were Fire. Both zero without Done items.
pub fn calculate_unplanned_done_stats(items: &[Item]) -> (f64, usize) {
    let done: Vec<&Item> = items.iter().filter(|item| item.is_done()).collect();
    if done.is_empty() {
        return (0.0, 0);
    }
    let unplanned_done = done
        .iter()
        .filter(|item| item.priority == Priority::Fire)
        .count();
    (percentage(unplanned_done, done.len()), unplanned_done)
}
