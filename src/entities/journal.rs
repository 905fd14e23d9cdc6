//! Daily journal: free-form notes and one-tap mood entries.

use crate::error::ValidationError;
use crate::query::{
    group_and_count, zero_filled, Comparator, DateWindow, Predicate, QueryContext, SortOrder,
};
use crate::types::{Entity, Record};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_pinned: bool,
}

impl Note {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tags: Vec::new(),
            is_pinned: false,
        }
    }

    pub fn pinned() -> Predicate<Record<Note>> {
        Predicate::flag(|r: &Record<Note>| r.fields.is_pinned)
    }

    pub fn tagged(tag: impl Into<String>) -> Predicate<Record<Note>> {
        Predicate::has_tag(|r: &Record<Note>| r.fields.tags.as_slice(), tag)
    }

    /// Pinned notes first, then most recently touched.
    pub fn default_order() -> Comparator<Record<Note>> {
        Comparator::by_key(|r: &Record<Note>| !r.fields.is_pinned, SortOrder::Ascending)
            .then(Comparator::recently_modified())
    }
}

impl Entity for Note {
    const KEY: &'static str = "notes";

    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() && self.body.trim().is_empty() {
            return Err(ValidationError::EmptyField("body"));
        }
        Ok(())
    }

    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.title.as_str(), self.body.as_str()];
        text.extend(self.tags.iter().map(String::as_str));
        text
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Low,
    Bad,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Great, Mood::Good, Mood::Okay, Mood::Low, Mood::Bad];

    /// 5 for great down to 1 for bad.
    pub fn score(self) -> u8 {
        match self {
            Mood::Great => 5,
            Mood::Good => 4,
            Mood::Okay => 3,
            Mood::Low => 2,
            Mood::Bad => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood: Mood,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub is_archived: bool,
}

impl MoodEntry {
    pub fn new(mood: Mood, date: NaiveDate) -> Self {
        Self {
            mood,
            date,
            note: String::new(),
            is_archived: false,
        }
    }

    pub fn active() -> Predicate<Record<MoodEntry>> {
        Predicate::flag(|r: &Record<MoodEntry>| r.fields.is_archived).not()
    }

    pub fn on(window: DateWindow) -> Predicate<Record<MoodEntry>> {
        Predicate::on_date(|r: &Record<MoodEntry>| r.fields.date, window)
    }

    pub fn feeling(mood: Mood) -> Predicate<Record<MoodEntry>> {
        Predicate::eq(|r: &Record<MoodEntry>| r.fields.mood, mood)
    }

    pub fn by_date(order: SortOrder) -> Comparator<Record<MoodEntry>> {
        Comparator::by_day(|r: &Record<MoodEntry>| r.fields.date, order)
    }
}

impl Entity for MoodEntry {
    const KEY: &'static str = "moods";

    fn search_text(&self) -> Vec<&str> {
        vec![self.note.as_str()]
    }
}

/// Consecutive days with at least one entry, ending today.
///
/// A day without an entry yet does not break the streak until it is over,
/// so counting starts from yesterday when today is still empty.
pub fn current_streak(entries: &[Record<MoodEntry>], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = entries
        .iter()
        .filter(|r| !r.fields.is_archived)
        .map(|r| r.fields.date)
        .collect();

    let mut day = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };
    let mut streak = 0;
    while days.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// Mood statistics over the active entries.
#[derive(Clone, Debug, PartialEq)]
pub struct MoodStats {
    pub entries: usize,
    /// Every mood, zero when unused.
    pub by_mood: Vec<(Mood, usize)>,
    /// Most frequent mood; ties go to the better mood.
    pub most_common: Option<Mood>,
    pub average_score: Option<f64>,
    pub streak: u32,
}

impl MoodStats {
    pub fn compute(entries: &[Record<MoodEntry>], ctx: &QueryContext) -> Self {
        let active: Vec<Record<MoodEntry>> = entries
            .iter()
            .filter(|r| !r.fields.is_archived)
            .cloned()
            .collect();
        let by_mood = zero_filled(&group_and_count(&active, |r| r.fields.mood), Mood::ALL);
        let most_common = by_mood
            .iter()
            .filter(|(_, n)| *n > 0)
            .fold(None, |best: Option<(Mood, usize)>, &(mood, n)| match best {
                Some((_, best_n)) if best_n >= n => best,
                _ => Some((mood, n)),
            })
            .map(|(mood, _)| mood);

        Self {
            entries: active.len(),
            by_mood,
            most_common,
            average_score: crate::query::average_by(&active, |r| f64::from(r.fields.mood.score())),
            streak: current_streak(&active, ctx.today()),
        }
    }
}
