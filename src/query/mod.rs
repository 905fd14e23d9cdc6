//! Stateless queries over record snapshots.
//!
//! Everything here is a pure function of its inputs: nothing touches a store.
//! The building blocks are:
//!
//! - [`Predicate`]: boolean criteria, ANDed by [`filter`]
//! - [`TextField`]: fields consulted by [`search`]
//! - [`Comparator`]: stable orderings applied by [`sort`]
//! - [`aggregate`]: grouping, counting, max/min/sum and day spans
//!
//! [`Query`] chains them in the one order used everywhere:
//! filter, then search, then sort, then limit.
//!
//! # Example
//!
//! ```ignore
//! let recent_first = Query::new()
//!     .filter(Predicate::within(|r: &Record<Note>| r.created_at, DateWindow::ThisMonth))
//!     .search("louvre", vec![TextField::entity()])
//!     .sort_by(Comparator::newest_first());
//!
//! let visible = store.query(&recent_first);
//! ```

pub mod aggregate;
mod predicate;
mod search;
mod sort;
mod window;

pub use aggregate::{
    average_by, days_between, duration_days, group_and_count, max_by, min_by, sum_by, zero_filled,
};
pub use predicate::{filter, Predicate};
pub use search::{search, TextField};
pub use sort::{compare_text, sort, Comparator, SortOrder};
pub use window::DateWindow;

use crate::types::{Entity, Record};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

/// The instant (and local offset) a query is evaluated at.
///
/// Relative date windows read "now" from here. Build a fresh context for
/// every evaluation; results legitimately change as time passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryContext {
    now: DateTime<FixedOffset>,
}

impl QueryContext {
    /// Wall-clock now in the machine's local offset.
    pub fn local_now() -> Self {
        Self {
            now: Local::now().fixed_offset(),
        }
    }

    /// A fixed instant with its own offset.
    pub fn at(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// A fixed instant evaluated in UTC.
    pub fn at_utc(now: DateTime<Utc>) -> Self {
        Self {
            now: now.fixed_offset(),
        }
    }

    /// A fixed instant evaluated in the machine's local offset.
    pub fn at_local(now: DateTime<Utc>) -> Self {
        Self {
            now: now.with_timezone(&Local).fixed_offset(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }

    /// Today's calendar date in the context's offset.
    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// Calendar date of `instant` in the context's offset.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.now.timezone()).date_naive()
    }
}

/// A filter → search → sort → limit pipeline.
pub struct Query<R> {
    predicates: Vec<Predicate<R>>,
    search: Option<(String, Vec<TextField<R>>)>,
    comparator: Option<Comparator<R>>,
    limit: Option<usize>,
}

impl<R> Clone for Query<R> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
            search: self.search.clone(),
            comparator: self.comparator.clone(),
            limit: self.limit,
        }
    }
}

impl<R> Default for Query<R> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
            search: None,
            comparator: None,
            limit: None,
        }
    }
}

impl<R> Query<R> {
    /// A query that returns its input unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate (ANDed with the others).
    pub fn filter(mut self, predicate: Predicate<R>) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Add several predicates.
    pub fn filters(mut self, predicates: impl IntoIterator<Item = Predicate<R>>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    /// Match `text` against `fields`. Blank text disables the search step.
    pub fn search(mut self, text: impl Into<String>, fields: Vec<TextField<R>>) -> Self {
        self.search = Some((text.into(), fields));
        self
    }

    /// Presentation order. Without one, original collection order is kept.
    pub fn sort_by(mut self, comparator: Comparator<R>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    /// Keep at most `n` items after sorting.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Evaluate against the wall clock.
    pub fn run(&self, items: Vec<R>) -> Vec<R> {
        self.run_with(items, &QueryContext::local_now())
    }

    /// Evaluate at a given context.
    pub fn run_with(&self, items: Vec<R>, ctx: &QueryContext) -> Vec<R> {
        let mut items = filter(items, &self.predicates, ctx);
        if let Some((text, fields)) = &self.search {
            items = search(items, text, fields);
        }
        if let Some(comparator) = &self.comparator {
            items = sort(items, comparator);
        }
        if let Some(n) = self.limit {
            items.truncate(n);
        }
        items
    }
}

impl<T: Entity> Query<Record<T>> {
    /// Search the entity's default text fields.
    pub fn search_text(self, text: impl Into<String>) -> Self {
        self.search(text, vec![TextField::entity()])
    }
}

impl<T: 'static> Comparator<Record<T>> {
    /// Most recently added first.
    pub fn newest_first() -> Self {
        Self::by_date(|r: &Record<T>| r.created_at, SortOrder::Descending)
    }

    /// Oldest first.
    pub fn oldest_first() -> Self {
        Self::by_date(|r: &Record<T>| r.created_at, SortOrder::Ascending)
    }

    /// Most recently changed first.
    pub fn recently_modified() -> Self {
        Self::by_date(|r: &Record<T>| r.last_modified(), SortOrder::Descending)
    }
}

impl<T: 'static> Predicate<Record<T>> {
    /// Records added inside `window`.
    pub fn created_within(window: DateWindow) -> Self {
        Self::within(|r: &Record<T>| r.created_at, window)
    }
}
