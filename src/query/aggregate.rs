//! Grouping and aggregate statistics.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::iter::Sum;

/// Count items per key. Only keys that occur are present.
pub fn group_and_count<R, K, F>(items: &[R], key: F) -> BTreeMap<K, usize>
where
    K: Ord,
    F: Fn(&R) -> K,
{
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(key(item)).or_insert(0) += 1;
    }
    counts
}

/// Spread observed counts over a full key space, in the order given, with
/// missing keys counted as zero.
pub fn zero_filled<K, I>(counts: &BTreeMap<K, usize>, keys: I) -> Vec<(K, usize)>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    keys.into_iter()
        .map(|k| {
            let n = counts.get(&k).copied().unwrap_or(0);
            (k, n)
        })
        .collect()
}

/// The item with the largest key. Ties go to the earliest item.
pub fn max_by<R, K, F>(items: &[R], key: F) -> Option<&R>
where
    K: PartialOrd,
    F: Fn(&R) -> K,
{
    pick(items, key, |candidate, best| candidate > best)
}

/// The item with the smallest key. Ties go to the earliest item.
pub fn min_by<R, K, F>(items: &[R], key: F) -> Option<&R>
where
    K: PartialOrd,
    F: Fn(&R) -> K,
{
    pick(items, key, |candidate, best| candidate < best)
}

fn pick<R, K, F, B>(items: &[R], key: F, better: B) -> Option<&R>
where
    F: Fn(&R) -> K,
    B: Fn(&K, &K) -> bool,
{
    let mut best: Option<(&R, K)> = None;
    for item in items {
        let k = key(item);
        match &best {
            Some((_, best_key)) if !better(&k, best_key) => {}
            _ => best = Some((item, k)),
        }
    }
    best.map(|(item, _)| item)
}

/// Sum of a derived value.
pub fn sum_by<R, S, F>(items: &[R], value: F) -> S
where
    S: Sum<S>,
    F: Fn(&R) -> S,
{
    items.iter().map(value).sum()
}

/// Mean of a derived value, `None` for no items.
pub fn average_by<R, F>(items: &[R], value: F) -> Option<f64>
where
    F: Fn(&R) -> f64,
{
    if items.is_empty() {
        return None;
    }
    Some(sum_by(items, value) / items.len() as f64)
}

/// Signed number of calendar days from `start` to `end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Length of a date range in days, never less than one.
///
/// Same-day and inverted ranges count as a single day.
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    days_between(start, end).max(1)
}
