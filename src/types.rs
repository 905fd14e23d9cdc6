//! Core types for the record store.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a record.
///
/// Opaque and random, so an id is never handed out twice even after the
/// record it named has been deleted.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Fresh random id.
    pub fn new() -> Self {
        RecordId(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RecordId(Uuid::parse_str(s)?))
    }
}

/// A kind of user record that can live in a [`RecordStore`](crate::RecordStore).
///
/// The store never looks inside `Self`; these hooks exist for callers that
/// want validation or default search fields.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the persistence slot holding the collection.
    const KEY: &'static str;

    /// Shape checks run by [`RecordStore::add_validated`](crate::RecordStore::add_validated)
    /// and [`RecordStore::update_validated`](crate::RecordStore::update_validated).
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Free-text fields consulted by the default search.
    fn search_text(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// A single record in the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    /// Unique identifier (assigned by store).
    pub id: RecordId,

    /// When the record was added (assigned by store).
    pub created_at: DateTime<Utc>,

    /// When the record was last replaced (assigned by store).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// User-editable content.
    pub fields: T,
}

impl<T> Record<T> {
    /// Most recent of `created_at` and `updated_at`.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// Same record with replaced fields, keeping id and timestamps.
    ///
    /// Handy for building the full-record value that `update` expects.
    pub fn with_fields(&self, fields: T) -> Self {
        Self {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            fields,
        }
    }
}

/// Store statistics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoreStats {
    pub record_count: usize,
    pub oldest_created: Option<DateTime<Utc>>,
    pub newest_created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    /// Size of the last successfully written blob.
    pub persisted_bytes: u64,
    /// Whether the in-memory collection has changes the adapter never accepted.
    pub dirty: bool,
}
