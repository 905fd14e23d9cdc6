//! Comparators and stable sorting.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

type Compare<R> = Arc<dyn Fn(&R, &R) -> Ordering + Send + Sync>;

/// An ordering over items. Equal items keep their original relative order
/// when sorted.
pub struct Comparator<R> {
    compare: Compare<R>,
}

impl<R> Clone for Comparator<R> {
    fn clone(&self) -> Self {
        Self {
            compare: Arc::clone(&self.compare),
        }
    }
}

impl<R> fmt::Debug for Comparator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparator(..)")
    }
}

impl<R: 'static> Comparator<R> {
    pub fn new<F>(compare: F) -> Self
    where
        F: Fn(&R, &R) -> Ordering + Send + Sync + 'static,
    {
        Self {
            compare: Arc::new(compare),
        }
    }

    /// Order by any totally ordered key.
    pub fn by_key<K, F>(key: F, order: SortOrder) -> Self
    where
        K: Ord,
        F: Fn(&R) -> K + Send + Sync + 'static,
    {
        Self::new(move |a, b| order.apply(key(a).cmp(&key(b))))
    }

    /// Order by an instant.
    pub fn by_date<F>(date: F, order: SortOrder) -> Self
    where
        F: Fn(&R) -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self::by_key(date, order)
    }

    /// Order by a calendar date.
    pub fn by_day<F>(date: F, order: SortOrder) -> Self
    where
        F: Fn(&R) -> NaiveDate + Send + Sync + 'static,
    {
        Self::by_key(date, order)
    }

    /// Order by a float, NaN sorting last in ascending order.
    pub fn by_number<F>(value: F, order: SortOrder) -> Self
    where
        F: Fn(&R) -> f64 + Send + Sync + 'static,
    {
        Self::new(move |a, b| order.apply(value(a).total_cmp(&value(b))))
    }

    /// Case-insensitive order over a text field.
    pub fn by_text<F>(text: F, order: SortOrder) -> Self
    where
        F: Fn(&R) -> &str + Send + Sync + 'static,
    {
        Self::new(move |a, b| order.apply(compare_text(text(a), text(b))))
    }

    /// Break ties of `self` with `next`.
    pub fn then(self, next: Comparator<R>) -> Self {
        Self::new(move |a, b| self.compare(a, b).then_with(|| next.compare(a, b)))
    }

    /// Opposite order.
    pub fn reversed(self) -> Self {
        Self::new(move |a, b| self.compare(b, a))
    }
}

impl<R> Comparator<R> {
    pub fn compare(&self, a: &R, b: &R) -> Ordering {
        (self.compare)(a, b)
    }
}

/// Case-insensitive comparison without allocating.
///
/// Only case is folded; strings differing in anything else stay ordered.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Stable sort: items comparing equal keep their relative order.
pub fn sort<R>(mut items: Vec<R>, comparator: &Comparator<R>) -> Vec<R> {
    items.sort_by(|a, b| comparator.compare(a, b));
    items
}
