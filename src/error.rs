//! Error types for the record store.

use crate::types::RecordId;
use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The mutation was applied in memory but could not be written out.
    /// `id` names the touched record; `None` for whole-collection changes.
    #[error("Change is applied in memory but not durable: {source}")]
    NotDurable {
        id: Option<RecordId>,
        #[source]
        source: PersistenceError,
    },

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl StoreError {
    /// True when the in-memory state was changed but the write behind it failed.
    pub fn is_not_durable(&self) -> bool {
        matches!(self, StoreError::NotDurable { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Deserialization(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for StoreError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for StoreError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        StoreError::Deserialization(e.to_string())
    }
}

/// Failure of the durable key-value slot behind a store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage directory is locked by another process")]
    Locked,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The collection could not be turned into bytes, so nothing was written.
    #[error("Could not encode collection: {0}")]
    Unencodable(String),
}

/// A record rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),

    #[error("`{start}` must not be after `{end}`")]
    InvalidRange {
        start: &'static str,
        end: &'static str,
    },

    #[error("`{field}` must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
}

impl ValidationError {
    /// Reject blank (empty or whitespace-only) required text.
    pub fn require_text(field: &'static str, value: &str) -> std::result::Result<(), Self> {
        if value.trim().is_empty() {
            Err(ValidationError::EmptyField(field))
        } else {
            Ok(())
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
