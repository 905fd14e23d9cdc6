//! Record types for the personal apps built on the store.
//!
//! Each entity owns its field layout, validation rules and the predicates,
//! comparators and statistics its screens use. Storage and querying are
//! shared: every entity lives in a [`RecordStore`](crate::RecordStore) keyed
//! by its `Entity::KEY`.

pub mod beauty;
pub mod games;
pub mod journal;
pub mod scents;
pub mod trips;

pub use beauty::{Procedure, ProcedureCategory, ProcedureStats};
pub use games::{Game, GameCategory, RuleSection};
pub use journal::{current_streak, Mood, MoodEntry, MoodStats, Note};
pub use scents::{ScentCombination, ScentStats, Season};
pub use trips::{Trip, TripCategory, TripStats, WishlistItem};
