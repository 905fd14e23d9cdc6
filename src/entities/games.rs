//! Board-game rules library. Rule sections are nested inside their game.

use crate::error::ValidationError;
use crate::query::{search, Comparator, Predicate, SortOrder, TextField};
use crate::types::{Entity, Record};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameCategory {
    Strategy,
    Party,
    Family,
    Cooperative,
    Card,
    Dice,
    Other,
}

impl GameCategory {
    pub const ALL: [GameCategory; 7] = [
        GameCategory::Strategy,
        GameCategory::Party,
        GameCategory::Family,
        GameCategory::Cooperative,
        GameCategory::Card,
        GameCategory::Dice,
        GameCategory::Other,
    ];
}

/// One titled chunk of a game's rules ("Setup", "Scoring", ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSection {
    pub title: String,
    pub body: String,
}

impl RuleSection {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    fn fields() -> Vec<TextField<RuleSection>> {
        vec![
            TextField::new("title", |s: &RuleSection| s.title.as_str()),
            TextField::new("body", |s: &RuleSection| s.body.as_str()),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub title: String,
    pub category: GameCategory,
    pub min_players: u8,
    pub max_players: u8,
    #[serde(default)]
    pub play_minutes: Option<u32>,
    #[serde(default)]
    pub sections: Vec<RuleSection>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Game {
    pub fn new(
        title: impl Into<String>,
        category: GameCategory,
        min_players: u8,
        max_players: u8,
    ) -> Self {
        Self {
            title: title.into(),
            category,
            min_players,
            max_players,
            play_minutes: None,
            sections: Vec::new(),
            is_favorite: false,
        }
    }

    pub fn with_section(mut self, section: RuleSection) -> Self {
        self.sections.push(section);
        self
    }

    pub fn add_section(&mut self, section: RuleSection) {
        self.sections.push(section);
    }

    /// Remove the section at `index`, if there is one.
    pub fn remove_section(&mut self, index: usize) -> Option<RuleSection> {
        (index < self.sections.len()).then(|| self.sections.remove(index))
    }

    /// Move a section to a new position. Returns false for out-of-range indices.
    pub fn move_section(&mut self, from: usize, to: usize) -> bool {
        if from >= self.sections.len() || to >= self.sections.len() {
            return false;
        }
        let section = self.sections.remove(from);
        self.sections.insert(to, section);
        true
    }

    /// Sections whose title or body contains `text`, in rule order.
    pub fn matching_sections(&self, text: &str) -> Vec<RuleSection> {
        search(self.sections.clone(), text, &RuleSection::fields())
    }

    pub fn supports(&self, players: u8) -> bool {
        (self.min_players..=self.max_players).contains(&players)
    }

    pub fn for_players(players: u8) -> Predicate<Record<Game>> {
        Predicate::matching(move |r: &Record<Game>| r.fields.supports(players))
    }

    pub fn favorites() -> Predicate<Record<Game>> {
        Predicate::flag(|r: &Record<Game>| r.fields.is_favorite)
    }

    pub fn in_category(category: GameCategory) -> Predicate<Record<Game>> {
        Predicate::eq(|r: &Record<Game>| r.fields.category, category)
    }

    pub fn by_title(order: SortOrder) -> Comparator<Record<Game>> {
        Comparator::by_text(|r: &Record<Game>| r.fields.title.as_str(), order)
    }
}

impl Entity for Game {
    const KEY: &'static str = "games";

    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require_text("title", &self.title)?;
        if self.min_players == 0 {
            return Err(ValidationError::OutOfRange {
                field: "min_players",
                min: 1,
                max: i64::from(u8::MAX),
                value: 0,
            });
        }
        if self.min_players > self.max_players {
            return Err(ValidationError::InvalidRange {
                start: "min_players",
                end: "max_players",
            });
        }
        for section in &self.sections {
            ValidationError::require_text("section title", &section.title)?;
        }
        Ok(())
    }

    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.title.as_str()];
        for section in &self.sections {
            text.push(&section.title);
            text.push(&section.body);
        }
        text
    }
}
