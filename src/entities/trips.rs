//! Trip diary: past/planned trips and a destination wishlist.

use crate::error::ValidationError;
use crate::query::{
    duration_days, group_and_count, max_by, sum_by, zero_filled, Comparator, DateWindow, Predicate,
    SortOrder,
};
use crate::types::{Entity, Record};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripCategory {
    Leisure,
    Business,
    Adventure,
    Family,
    Weekend,
}

impl TripCategory {
    pub const ALL: [TripCategory; 5] = [
        TripCategory::Leisure,
        TripCategory::Business,
        TripCategory::Adventure,
        TripCategory::Family,
        TripCategory::Weekend,
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub title: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub category: TripCategory,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub notes: String,
}

impl Trip {
    pub fn new(
        title: impl Into<String>,
        destination: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            destination: destination.into(),
            start_date,
            end_date,
            category: TripCategory::Leisure,
            is_favorite: false,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_category(mut self, category: TripCategory) -> Self {
        self.category = category;
        self
    }

    /// Days spent, counting a same-day trip as one.
    pub fn duration_days(&self) -> i64 {
        duration_days(self.start_date, self.end_date)
    }

    // --- Query building blocks ---

    pub fn favorites() -> Predicate<Record<Trip>> {
        Predicate::flag(|r: &Record<Trip>| r.fields.is_favorite)
    }

    pub fn in_category(category: TripCategory) -> Predicate<Record<Trip>> {
        Predicate::eq(|r: &Record<Trip>| r.fields.category, category)
    }

    /// Trips starting inside `window`.
    pub fn starting(window: DateWindow) -> Predicate<Record<Trip>> {
        Predicate::on_date(|r: &Record<Trip>| r.fields.start_date, window)
    }

    /// Trips that have not started yet (or start today).
    pub fn upcoming() -> Predicate<Record<Trip>> {
        Self::starting(DateWindow::Upcoming)
    }

    /// Trips that are over.
    pub fn completed() -> Predicate<Record<Trip>> {
        Predicate::on_date(|r: &Record<Trip>| r.fields.end_date, DateWindow::Past)
    }

    pub fn by_start(order: SortOrder) -> Comparator<Record<Trip>> {
        Comparator::by_day(|r: &Record<Trip>| r.fields.start_date, order)
    }

    pub fn by_title(order: SortOrder) -> Comparator<Record<Trip>> {
        Comparator::by_text(|r: &Record<Trip>| r.fields.title.as_str(), order)
    }
}

impl Entity for Trip {
    const KEY: &'static str = "trips";

    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require_text("title", &self.title)?;
        ValidationError::require_text("destination", &self.destination)?;
        if self.start_date > self.end_date {
            return Err(ValidationError::InvalidRange {
                start: "start_date",
                end: "end_date",
            });
        }
        Ok(())
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.title, &self.destination, &self.notes]
            .into_iter()
            .map(String::as_str)
            .collect()
    }
}

/// Travel statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct TripStats {
    pub total_trips: usize,
    pub total_days: i64,
    pub favorites: usize,
    pub longest: Option<Record<Trip>>,
    /// Every category, zero when unused.
    pub by_category: Vec<(TripCategory, usize)>,
    /// Trips per starting year (observed years only).
    pub by_year: BTreeMap<i32, usize>,
    pub destinations: usize,
}

impl TripStats {
    pub fn compute(trips: &[Record<Trip>]) -> Self {
        let by_category = group_and_count(trips, |r| r.fields.category);
        let destinations = group_and_count(trips, |r| r.fields.destination.trim().to_lowercase());

        Self {
            total_trips: trips.len(),
            total_days: sum_by(trips, |r| r.fields.duration_days()),
            favorites: trips.iter().filter(|r| r.fields.is_favorite).count(),
            longest: max_by(trips, |r| r.fields.duration_days()).cloned(),
            by_category: zero_filled(&by_category, TripCategory::ALL),
            by_year: group_and_count(trips, |r| r.fields.start_date.year()),
            destinations: destinations.len(),
        }
    }
}

/// A place the user wants to visit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub title: String,
    pub destination: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_priority: bool,
}

impl WishlistItem {
    pub fn new(title: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            destination: destination.into(),
            notes: String::new(),
            is_priority: false,
        }
    }

    pub fn priority() -> Predicate<Record<WishlistItem>> {
        Predicate::flag(|r: &Record<WishlistItem>| r.fields.is_priority)
    }

    /// Priority items first, then alphabetical.
    pub fn default_order() -> Comparator<Record<WishlistItem>> {
        Comparator::by_key(|r: &Record<WishlistItem>| !r.fields.is_priority, SortOrder::Ascending)
            .then(Comparator::by_text(
                |r: &Record<WishlistItem>| r.fields.title.as_str(),
                SortOrder::Ascending,
            ))
    }
}

impl Entity for WishlistItem {
    const KEY: &'static str = "wishlist";

    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require_text("title", &self.title)
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.title, &self.destination, &self.notes]
            .into_iter()
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{sort, Query, QueryContext};
    use crate::types::RecordId;
    use chrono::{TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record<T>(fields: T) -> Record<T> {
        Record {
            id: RecordId::new(),
            created_at: Utc::now(),
            updated_at: None,
            fields,
        }
    }

    fn ctx() -> QueryContext {
        QueryContext::at_utc(Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_validation() {
        assert!(Trip::new("Rome", "Italy", day(2024, 1, 1), day(2024, 1, 3))
            .validate()
            .is_ok());
        assert_eq!(
            Trip::new("", "Italy", day(2024, 1, 1), day(2024, 1, 3)).validate(),
            Err(ValidationError::EmptyField("title"))
        );
        assert!(matches!(
            Trip::new("Rome", "Italy", day(2024, 1, 5), day(2024, 1, 3)).validate(),
            Err(ValidationError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_upcoming_and_completed() {
        let trips = vec![
            record(Trip::new("Past", "A", day(2024, 4, 1), day(2024, 4, 3))),
            record(Trip::new("Ongoing", "B", day(2024, 5, 14), day(2024, 5, 16))),
            record(Trip::new("Next", "C", day(2024, 6, 1), day(2024, 6, 2))),
        ];
        let titles = |q: Query<Record<Trip>>| -> Vec<String> {
            q.run_with(trips.clone(), &ctx())
                .into_iter()
                .map(|r| r.fields.title)
                .collect()
        };

        assert_eq!(titles(Query::new().filter(Trip::upcoming())), vec!["Next"]);
        assert_eq!(titles(Query::new().filter(Trip::completed())), vec!["Past"]);
        assert_eq!(
            titles(Query::new().filter(Trip::starting(DateWindow::ThisMonth))),
            vec!["Ongoing"]
        );
    }

    #[test]
    fn test_stats() {
        let trips = vec![
            record(Trip::new("Day trip", "Bruges", day(2024, 3, 2), day(2024, 3, 2))),
            record(
                Trip::new("Alps", "Chamonix", day(2023, 7, 1), day(2023, 7, 11))
                    .with_category(TripCategory::Adventure),
            ),
            record(Trip::new("Bruges again", "bruges ", day(2024, 9, 1), day(2024, 9, 4))),
        ];
        let stats = TripStats::compute(&trips);

        assert_eq!(stats.total_trips, 3);
        assert_eq!(stats.total_days, 1 + 10 + 3);
        assert_eq!(stats.longest.unwrap().fields.title, "Alps");
        assert_eq!(stats.by_category.len(), TripCategory::ALL.len());
        assert!(stats.by_category.contains(&(TripCategory::Leisure, 2)));
        assert!(stats.by_category.contains(&(TripCategory::Business, 0)));
        assert_eq!(stats.by_year[&2024], 2);
        assert_eq!(stats.destinations, 2);
    }

    #[test]
    fn test_stats_empty() {
        let stats = TripStats::compute(&[]);
        assert_eq!(stats.total_days, 0);
        assert!(stats.longest.is_none());
        assert!(stats.by_category.iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_wishlist_order() {
        let mut urgent = WishlistItem::new("zanzibar", "Tanzania");
        urgent.is_priority = true;
        let items = vec![
            record(WishlistItem::new("Oslo", "Norway")),
            record(urgent),
            record(WishlistItem::new("amsterdam", "Netherlands")),
        ];
        let titles: Vec<_> = sort(items, &WishlistItem::default_order())
            .into_iter()
            .map(|r| r.fields.title)
            .collect();
        assert_eq!(titles, vec!["zanzibar", "amsterdam", "Oslo"]);
    }
}
