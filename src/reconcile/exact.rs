//! Exact reconciliation on canonical keys.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use super::canonical::{CanonicalKey, NamedItem};

/// All items on both sides that share one canonical key.
#[derive(Debug)]
pub struct MatchedGroup<'a, L, R> {
    pub key: CanonicalKey,
    pub left: Vec<&'a NamedItem<L>>,
    pub right: Vec<&'a NamedItem<R>>,
}

/// Partition produced by [`reconcile`].
#[derive(Debug)]
pub struct MatchResult<'a, L, R> {
    /// Matched groups in ascending key order.
    pub matched: Vec<MatchedGroup<'a, L, R>>,
    pub unmatched_left: Vec<&'a NamedItem<L>>,
    pub unmatched_right: Vec<&'a NamedItem<R>>,
    pub left_total: usize,
    pub right_total: usize,
    pub left_distinct_keys: usize,
    pub right_distinct_keys: usize,
}

impl<L, R> MatchResult<'_, L, R> {
    pub fn matched_keys(&self) -> usize {
        self.matched.len()
    }

    /// Number of left items in matched groups (sum of group sizes).
    pub fn matched_left_count(&self) -> usize {
        self.matched.iter().map(|group| group.left.len()).sum()
    }

    pub fn matched_right_count(&self) -> usize {
        self.matched.iter().map(|group| group.right.len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.unmatched_left.is_empty() && self.unmatched_right.is_empty()
    }
}

/// Partition two collections by canonical key equality.
///
/// Every item whose key appears on both sides is matched, duplicates
/// included. Unmatched items are sorted case-insensitively by display form,
/// keeping input order for ties.
pub fn reconcile<'a, L, R>(
    left: &'a [NamedItem<L>],
    right: &'a [NamedItem<R>],
) -> MatchResult<'a, L, R> {
    let left_groups = group_by_key(left);
    let right_groups = group_by_key(right);

    let left_keys: BTreeSet<&CanonicalKey> = left_groups.keys().copied().collect();
    let right_keys: BTreeSet<&CanonicalKey> = right_groups.keys().copied().collect();

    let matched: Vec<MatchedGroup<'a, L, R>> = left_keys
        .intersection(&right_keys)
        .map(|key| MatchedGroup {
            key: (*key).clone(),
            left: left_groups[*key].clone(),
            right: right_groups[*key].clone(),
        })
        .collect();

    let mut unmatched_left: Vec<&NamedItem<L>> = left
        .iter()
        .filter(|item| !right_keys.contains(item.key()))
        .collect();
    let mut unmatched_right: Vec<&NamedItem<R>> = right
        .iter()
        .filter(|item| !left_keys.contains(item.key()))
        .collect();

    sort_for_report(&mut unmatched_left);
    sort_for_report(&mut unmatched_right);

    debug!(
        "Exact reconciliation: {} matched keys, {} unmatched left, {} unmatched right",
        matched.len(),
        unmatched_left.len(),
        unmatched_right.len()
    );

    MatchResult {
        matched,
        unmatched_left,
        unmatched_right,
        left_total: left.len(),
        right_total: right.len(),
        left_distinct_keys: left_keys.len(),
        right_distinct_keys: right_keys.len(),
    }
}

fn group_by_key<P>(items: &[NamedItem<P>]) -> BTreeMap<&CanonicalKey, Vec<&NamedItem<P>>> {
    let mut groups: BTreeMap<&CanonicalKey, Vec<&NamedItem<P>>> = BTreeMap::new();
    for item in items {
        groups.entry(item.key()).or_default().push(item);
    }
    groups
}

fn sort_for_report<P>(items: &mut [&NamedItem<P>]) {
    items.sort_by_cached_key(|item| item.display().to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(names: &[&str]) -> Vec<NamedItem<usize>> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| NamedItem::new(*name, idx))
            .collect()
    }

    fn displays<P>(items: &[&NamedItem<P>]) -> Vec<String> {
        items.iter().map(|item| item.display().to_string()).collect()
    }

    #[test]
    fn accent_only_difference_matches() {
        let left = items(&["Café"]);
        let right = items(&["cafe"]);
        let result = reconcile(&left, &right);

        assert_eq!(result.matched_keys(), 1);
        assert_eq!(result.matched[0].key.as_str(), "cafe");
        assert!(result.is_complete());
    }

    #[test]
    fn duplicates_are_counted_per_item() {
        let left = items(&["Fiancé", "Fiance", "Mason"]);
        let right = items(&["fiance", "mason", "Mason"]);
        let result = reconcile(&left, &right);

        assert_eq!(result.matched_keys(), 2);
        assert_eq!(result.matched_left_count(), 3);
        assert_eq!(result.matched_right_count(), 3);
        assert_eq!(result.left_distinct_keys, 2);
        assert_eq!(result.right_distinct_keys, 2);

        let fiance = &result.matched[0];
        assert_eq!(fiance.key.as_str(), "fiance");
        assert_eq!(fiance.left.len(), 2);
        assert_eq!(fiance.left[0].payload, 0);
        assert_eq!(fiance.left[1].payload, 1);
    }

    #[test]
    fn partition_covers_every_item_once() {
        let left = items(&["Plow Driver", "Trowel", "Scholar", "Stonecutter"]);
        let right = items(&["trowel", "plow-driver", "stonecuter", "misc"]);
        let result = reconcile(&left, &right);

        assert_eq!(
            result.matched_left_count() + result.unmatched_left.len(),
            left.len()
        );
        assert_eq!(
            result.matched_right_count() + result.unmatched_right.len(),
            right.len()
        );

        let matched_keys: Vec<&CanonicalKey> = result.matched.iter().map(|g| &g.key).collect();
        assert!(
            result
                .unmatched_left
                .iter()
                .all(|item| !matched_keys.contains(&item.key()))
        );
        assert!(
            result
                .unmatched_right
                .iter()
                .all(|item| !matched_keys.contains(&item.key()))
        );
    }

    #[test]
    fn unmatched_are_sorted_case_insensitively_and_stably() {
        let left = items(&["beta", "Alpha", "alpha", "Gamma"]);
        let right: Vec<NamedItem<usize>> = Vec::new();
        let result = reconcile(&left, &right);

        assert_eq!(
            displays(&result.unmatched_left),
            vec!["Alpha", "alpha", "beta", "Gamma"]
        );
        assert_eq!(result.unmatched_left[0].payload, 1);
        assert_eq!(result.unmatched_left[1].payload, 2);
    }

    #[test]
    fn empty_inputs_produce_empty_result() {
        let left: Vec<NamedItem<()>> = Vec::new();
        let right: Vec<NamedItem<()>> = Vec::new();
        let result = reconcile(&left, &right);
        assert!(result.matched.is_empty());
        assert!(result.is_complete());
    }
}
