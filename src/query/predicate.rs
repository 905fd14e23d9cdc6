//! Filter predicates.

use super::{DateWindow, QueryContext};
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::sync::Arc;

type Test<R> = Arc<dyn Fn(&R, &QueryContext) -> bool + Send + Sync>;

/// A boolean criterion over one item.
///
/// Predicates are cheap to clone and compose with [`and`](Self::and),
/// [`or`](Self::or) and [`not`](Self::not).
pub struct Predicate<R> {
    test: Test<R>,
}

impl<R> Clone for Predicate<R> {
    fn clone(&self) -> Self {
        Self {
            test: Arc::clone(&self.test),
        }
    }
}

impl<R> fmt::Debug for Predicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

impl<R: 'static> Predicate<R> {
    /// Predicate that needs the query context (e.g. the current time).
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&R, &QueryContext) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Arc::new(test),
        }
    }

    /// Predicate over the item alone.
    pub fn matching<F>(test: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        Self::new(move |item, _| test(item))
    }

    /// Items whose boolean flag is set (favorite, priority, ...).
    pub fn flag<F>(flag: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        Self::matching(flag)
    }

    /// Items whose key equals `value`.
    pub fn eq<K, F>(key: F, value: K) -> Self
    where
        K: PartialEq + Send + Sync + 'static,
        F: Fn(&R) -> K + Send + Sync + 'static,
    {
        Self::matching(move |item| key(item) == value)
    }

    /// Items whose key is any of `values`.
    pub fn one_of<K, F>(key: F, values: Vec<K>) -> Self
    where
        K: PartialEq + Send + Sync + 'static,
        F: Fn(&R) -> K + Send + Sync + 'static,
    {
        Self::matching(move |item| values.contains(&key(item)))
    }

    /// Items whose tag list contains `tag` (case-insensitive).
    pub fn has_tag<F>(tags: F, tag: impl Into<String>) -> Self
    where
        F: Fn(&R) -> &[String] + Send + Sync + 'static,
    {
        let tag = tag.into().to_lowercase();
        Self::matching(move |item| tags(item).iter().any(|t| t.to_lowercase() == tag))
    }

    /// Items whose instant falls inside `window`, evaluated at query time.
    pub fn within<F>(instant: F, window: DateWindow) -> Self
    where
        F: Fn(&R) -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self::new(move |item, ctx| window.contains(instant(item), ctx))
    }

    /// Like [`within`](Self::within) for optional instants. Missing never matches.
    pub fn within_opt<F>(instant: F, window: DateWindow) -> Self
    where
        F: Fn(&R) -> Option<DateTime<Utc>> + Send + Sync + 'static,
    {
        Self::new(move |item, ctx| instant(item).is_some_and(|i| window.contains(i, ctx)))
    }

    /// Items whose calendar date falls inside `window`.
    pub fn on_date<F>(date: F, window: DateWindow) -> Self
    where
        F: Fn(&R) -> NaiveDate + Send + Sync + 'static,
    {
        Self::new(move |item, ctx| window.contains_date(date(item), ctx))
    }

    /// Both predicates hold.
    pub fn and(self, other: Predicate<R>) -> Self {
        Self::new(move |item, ctx| self.test(item, ctx) && other.test(item, ctx))
    }

    /// Either predicate holds.
    pub fn or(self, other: Predicate<R>) -> Self {
        Self::new(move |item, ctx| self.test(item, ctx) || other.test(item, ctx))
    }

    /// Negation.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::new(move |item, ctx| !self.test(item, ctx))
    }
}

impl<R> Predicate<R> {
    /// Evaluate against one item.
    pub fn test(&self, item: &R, ctx: &QueryContext) -> bool {
        (self.test)(item, ctx)
    }
}

/// Keep the items satisfying every predicate, in their original order.
///
/// An empty predicate list keeps everything.
pub fn filter<R>(mut items: Vec<R>, predicates: &[Predicate<R>], ctx: &QueryContext) -> Vec<R> {
    if predicates.is_empty() {
        return items;
    }
    items.retain(|item| predicates.iter().all(|p| p.test(item, ctx)));
    items
}
