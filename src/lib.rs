//! # Keepsake
//!
//! A small typed record store for personal apps: trip diaries, procedure
//! trackers, rules libraries, scent catalogs and journals.
//!
//! ## Core Concepts
//!
//! - **Records**: Entity fields wrapped with a store-assigned id and timestamps
//! - **Store**: One in-memory collection per entity, rewritten in full on every change
//! - **Persistence**: A pluggable slot that holds the encoded collection
//! - **Queries**: Composable filters, text search, sorting and aggregates
//!
//! ## Example
//!
//! ```ignore
//! use keepsake::entities::{Trip, TripStats};
//! use keepsake::{DateWindow, FileAdapterConfig, FileStorage, Query, RecordStore, StoreConfig};
//!
//! let storage = FileStorage::open(FileAdapterConfig {
//!     dir: "./my-trips".into(),
//!     ..Default::default()
//! })?;
//! let trips: RecordStore<Trip> = RecordStore::open_in(&storage, StoreConfig::default());
//!
//! trips.add_validated(Trip::new("Museums", "Paris", start, end).with_notes("Louvre"))?;
//!
//! let this_month = trips.query(
//!     &Query::new()
//!         .filter(Trip::starting(DateWindow::ThisMonth))
//!         .search_text("louvre"),
//! );
//! let stats = TripStats::compute(&trips.all());
//! ```

pub mod clock;
pub mod codec;
pub mod entities;
pub mod error;
pub mod persistence;
pub mod query;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::Encoding;
pub use error::{PersistenceError, Result, StoreError, ValidationError};
pub use persistence::{FileAdapterConfig, FileSlot, FileStorage, MemoryAdapter, PersistenceAdapter};
pub use query::{Comparator, DateWindow, Predicate, Query, QueryContext, SortOrder, TextField};
pub use store::{LoadOutcome, RecordStore, StoreConfig};
pub use subscriptions::{
    DropReason, EventKind, StoreEvent, SubscriptionConfig, SubscriptionFilter,
    SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
pub use types::*;
