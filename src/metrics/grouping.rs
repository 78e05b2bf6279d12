//! Grouping reducers.
//!
//! Status and priority are single-valued, so their group sizes always sum to
//! the item count. Assignees are multi-valued: an item lands in one group per
//! assignee, or in the synthetic [`UNASSIGNED`] group when it has none, so the
//! group sizes sum to at least the item count.

use std::collections::BTreeMap;

use crate::core::{Item, Priority, Status};

/// Group key for items without any assignee.
pub const UNASSIGNED: &str = "Unassigned";

pub type StatusGroups = BTreeMap<Status, Vec<Item>>;
pub type PriorityGroups = BTreeMap<Priority, Vec<Item>>;
pub type AssigneeGroups = BTreeMap<String, Vec<Item>>;

fn group_by_key<K: Ord>(items: &[Item], key: impl Fn(&Item) -> K) -> BTreeMap<K, Vec<Item>> {
    items.iter().fold(BTreeMap::new(), |mut groups, item| {
        groups.entry(key(item)).or_insert_with(Vec::new).push(item.clone());
        groups
    })
}

pub fn group_by_status(items: &[Item]) -> StatusGroups {
    group_by_key(items, |item| item.status)
}

pub fn group_by_priority(items: &[Item]) -> PriorityGroups {
    group_by_key(items, |item| item.priority)
}

pub fn group_by_assignee(items: &[Item]) -> AssigneeGroups {
    let mut groups = AssigneeGroups::new();
    for item in items {
        if item.is_unassigned() {
            groups.entry(UNASSIGNED.to_string()).or_default().push(item.clone());
            continue;
        }
        for assignee in &item.assignees {
            groups.entry(assignee.clone()).or_default().push(item.clone());
        }
    }
    groups
}

/// Group sizes keyed by the group key, for renderers that only need counts.
pub fn group_counts<K: Clone + Ord>(groups: &BTreeMap<K, Vec<Item>>) -> BTreeMap<K, usize> {
    groups
        .iter()
        .map(|(key, members)| (key.clone(), members.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Item> {
        vec![
            Item::new("1", "a", Status::Todo, Priority::Fire).with_assignees(["user1"]),
            Item::new("2", "b", Status::InProgress, Priority::P1).with_assignees(["user2"]),
            Item::new("3", "c", Status::Done, Priority::P1).with_assignees(["user1"]),
        ]
    }

    #[test]
    fn test_group_by_status() {
        let groups = group_by_status(&sample());
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[&Status::Todo].len(), 1);
        assert_eq!(groups[&Status::Done][0].id, "3");
    }

    #[test]
    fn test_group_by_priority_keeps_input_order_within_group() {
        let groups = group_by_priority(&sample());
        let p1: Vec<_> = groups[&Priority::P1].iter().map(|i| i.id.as_str()).collect();
        assert_eq!(p1, vec!["2", "3"]);
        assert_eq!(groups[&Priority::Fire].len(), 1);
    }

    #[test]
    fn test_group_by_assignee() {
        let groups = group_by_assignee(&sample());
        assert_eq!(groups["user1"].len(), 2);
        assert_eq!(groups["user2"].len(), 1);
        assert!(!groups.contains_key(UNASSIGNED));
    }

    #[test]
    fn test_unassigned_items_get_synthetic_group() {
        let items = vec![
            Item::new("1", "a", Status::Todo, Priority::P2),
            Item::new("2", "b", Status::Todo, Priority::P2),
        ];
        let groups = group_by_assignee(&items);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[UNASSIGNED].len(), 2);
    }

    #[test]
    fn test_multi_assignee_item_appears_in_each_group() {
        let items = vec![Item::new("1", "pair", Status::Todo, Priority::P2).with_assignees(["ana", "bo"])];
        let groups = group_by_assignee(&items);
        let total: usize = groups.values().map(Vec::len).sum();

        assert_eq!(groups["ana"][0].id, "1");
        assert_eq!(groups["bo"][0].id, "1");
        assert_eq!(total, 2);
    }

    #[test]
    fn test_empty_input_gives_empty_groups() {
        assert!(group_by_status(&[]).is_empty());
        assert!(group_by_priority(&[]).is_empty());
        assert!(group_by_assignee(&[]).is_empty());
    }

    #[test]
    fn test_group_counts() {
        let counts = group_counts(&group_by_status(&sample()));
        assert_eq!(counts.get(&Status::InProgress), Some(&1));
        assert_eq!(counts.values().sum::<usize>(), 3);
    }
}
