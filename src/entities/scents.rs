//! Scent-combination catalog.

use crate::error::ValidationError;
use crate::query::{
    average_by, group_and_count, max_by, zero_filled, Comparator, Predicate, SortOrder,
};
use crate::types::{Entity, Record};
use serde::{Deserialize, Serialize};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
    AllYear,
}

impl Season {
    pub const ALL: [Season; 5] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
        Season::AllYear,
    ];
}

/// Fragrances worn together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScentCombination {
    pub name: String,
    /// Individual fragrances in the combination.
    pub fragrances: Vec<String>,
    pub season: Season,
    pub rating: u8,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub comment: String,
}

impl ScentCombination {
    pub fn new<I, S>(name: impl Into<String>, fragrances: I, season: Season, rating: u8) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fragrances: fragrances.into_iter().map(Into::into).collect(),
            season,
            rating,
            is_favorite: false,
            is_archived: false,
            comment: String::new(),
        }
    }

    /// Not archived. Lists show only these unless asked otherwise.
    pub fn active() -> Predicate<Record<ScentCombination>> {
        Predicate::flag(|r: &Record<ScentCombination>| r.fields.is_archived).not()
    }

    pub fn archived() -> Predicate<Record<ScentCombination>> {
        Predicate::flag(|r: &Record<ScentCombination>| r.fields.is_archived)
    }

    pub fn favorites() -> Predicate<Record<ScentCombination>> {
        Predicate::flag(|r: &Record<ScentCombination>| r.fields.is_favorite)
    }

    /// Wearable in `season`: made for it or for all year.
    pub fn wearable_in(season: Season) -> Predicate<Record<ScentCombination>> {
        Predicate::one_of(
            |r: &Record<ScentCombination>| r.fields.season,
            vec![season, Season::AllYear],
        )
    }

    /// Contains the named fragrance (case-insensitive).
    pub fn with_fragrance(fragrance: impl Into<String>) -> Predicate<Record<ScentCombination>> {
        Predicate::has_tag(
            |r: &Record<ScentCombination>| r.fields.fragrances.as_slice(),
            fragrance,
        )
    }

    /// Best rated first, then by name.
    pub fn best_first() -> Comparator<Record<ScentCombination>> {
        Comparator::by_key(|r: &Record<ScentCombination>| r.fields.rating, SortOrder::Descending)
            .then(Comparator::by_text(
                |r: &Record<ScentCombination>| r.fields.name.as_str(),
                SortOrder::Ascending,
            ))
    }
}

impl Entity for ScentCombination {
    const KEY: &'static str = "scent_combinations";

    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require_text("name", &self.name)?;
        if self.fragrances.iter().all(|f| f.trim().is_empty()) {
            return Err(ValidationError::EmptyField("fragrances"));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ValidationError::OutOfRange {
                field: "rating",
                min: i64::from(MIN_RATING),
                max: i64::from(MAX_RATING),
                value: i64::from(self.rating),
            });
        }
        Ok(())
    }

    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.name.as_str(), self.comment.as_str()];
        text.extend(self.fragrances.iter().map(String::as_str));
        text
    }
}

/// Catalog statistics. Archived combinations only count towards `archived`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScentStats {
    pub active: usize,
    pub archived: usize,
    pub favorites: usize,
    pub average_rating: Option<f64>,
    pub top_rated: Option<Record<ScentCombination>>,
    /// Every season, zero when unused.
    pub by_season: Vec<(Season, usize)>,
}

impl ScentStats {
    pub fn compute(combinations: &[Record<ScentCombination>]) -> Self {
        let (archived, active): (Vec<_>, Vec<_>) = combinations
            .iter()
            .cloned()
            .partition(|r| r.fields.is_archived);
        let by_season = group_and_count(&active, |r| r.fields.season);

        Self {
            active: active.len(),
            archived: archived.len(),
            favorites: active.iter().filter(|r| r.fields.is_favorite).count(),
            average_rating: average_by(&active, |r| f64::from(r.fields.rating)),
            top_rated: max_by(&active, |r| r.fields.rating).cloned(),
            by_season: zero_filled(&by_season, Season::ALL),
        }
    }
}
