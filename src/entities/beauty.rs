//! Beauty procedure tracker.

use crate::error::ValidationError;
use crate::query::{
    group_and_count, sum_by, zero_filled, Comparator, DateWindow, Predicate, QueryContext,
    SortOrder,
};
use crate::types::{Entity, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureCategory {
    Hair,
    Nails,
    Skin,
    Brows,
    Lashes,
    Massage,
    Other,
}

impl ProcedureCategory {
    pub const ALL: [ProcedureCategory; 7] = [
        ProcedureCategory::Hair,
        ProcedureCategory::Nails,
        ProcedureCategory::Skin,
        ProcedureCategory::Brows,
        ProcedureCategory::Lashes,
        ProcedureCategory::Massage,
        ProcedureCategory::Other,
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    pub category: ProcedureCategory,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub salon: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub notes: String,
}

impl Procedure {
    pub fn new(
        name: impl Into<String>,
        category: ProcedureCategory,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            scheduled_at,
            salon: None,
            cost: None,
            is_done: false,
            notes: String::new(),
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn scheduled(window: DateWindow) -> Predicate<Record<Procedure>> {
        Predicate::within(|r: &Record<Procedure>| r.fields.scheduled_at, window)
    }

    pub fn upcoming() -> Predicate<Record<Procedure>> {
        Self::scheduled(DateWindow::Upcoming)
    }

    pub fn past() -> Predicate<Record<Procedure>> {
        Self::scheduled(DateWindow::Past)
    }

    pub fn in_category(category: ProcedureCategory) -> Predicate<Record<Procedure>> {
        Predicate::eq(|r: &Record<Procedure>| r.fields.category, category)
    }

    pub fn done() -> Predicate<Record<Procedure>> {
        Predicate::flag(|r: &Record<Procedure>| r.fields.is_done)
    }

    pub fn by_schedule(order: SortOrder) -> Comparator<Record<Procedure>> {
        Comparator::by_date(|r: &Record<Procedure>| r.fields.scheduled_at, order)
    }
}

impl Entity for Procedure {
    const KEY: &'static str = "procedures";

    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require_text("name", &self.name)?;
        match self.cost {
            Some(cost) if !cost.is_finite() || cost < 0.0 => Err(ValidationError::OutOfRange {
                field: "cost",
                min: 0,
                max: i64::MAX,
                value: cost as i64,
            }),
            _ => Ok(()),
        }
    }

    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.name.as_str(), self.notes.as_str()];
        text.extend(self.salon.as_deref());
        text
    }
}

/// Procedure statistics at a point in time.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcedureStats {
    pub total: usize,
    pub done: usize,
    pub upcoming: usize,
    pub total_spent: f64,
    /// Every category, zero when unused.
    pub by_category: Vec<(ProcedureCategory, usize)>,
    /// Most used category; ties go to the earlier category in `ALL`.
    pub favorite_category: Option<ProcedureCategory>,
}

impl ProcedureStats {
    pub fn compute(procedures: &[Record<Procedure>], ctx: &QueryContext) -> Self {
        let counts = group_and_count(procedures, |r| r.fields.category);
        let by_category = zero_filled(&counts, ProcedureCategory::ALL);
        let favorite_category = by_category
            .iter()
            .filter(|(_, n)| *n > 0)
            .fold(None, |best: Option<(ProcedureCategory, usize)>, &(c, n)| match best {
                Some((_, best_n)) if best_n >= n => best,
                _ => Some((c, n)),
            })
            .map(|(c, _)| c);
        let upcoming = Procedure::upcoming();

        Self {
            total: procedures.len(),
            done: procedures.iter().filter(|r| r.fields.is_done).count(),
            upcoming: procedures.iter().filter(|r| upcoming.test(r, ctx)).count(),
            total_spent: sum_by(procedures, |r| {
                if r.fields.is_done {
                    r.fields.cost.unwrap_or(0.0)
                } else {
                    0.0
                }
            }),
            by_category,
            favorite_category,
        }
    }
}
