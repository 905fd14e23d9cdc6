//! The record store: one in-memory collection and the slot that persists it.

use crate::clock::{Clock, SystemClock};
use crate::codec::Encoding;
use crate::error::{PersistenceError, Result, StoreError};
use crate::persistence::{FileStorage, MemoryAdapter, PersistenceAdapter};
use crate::query::{Query, QueryContext};
use crate::subscriptions::{
    StoreEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
use crate::types::{Entity, Record, RecordId, StoreStats};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Store configuration.
#[derive(Clone, Debug, Default)]
pub struct StoreConfig {
    /// Collection name used for events, logs and file slots.
    /// Defaults to the entity's `KEY`.
    pub key: Option<String>,

    /// Encoding of the persisted collection.
    pub encoding: Encoding,
}

/// What happened when the store read its slot at open time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing was saved before.
    Empty,
    /// Records were restored. Later copies of a repeated id are discarded.
    Loaded {
        records: usize,
        dropped_duplicates: usize,
    },
    /// The slot could not be read; the store started empty.
    Unreadable(String),
    /// The slot held bytes that did not decode; the store started empty.
    Malformed(String),
}

impl LoadOutcome {
    /// True when earlier data may exist but could not be used.
    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadOutcome::Unreadable(_) | LoadOutcome::Malformed(_))
    }
}

/// The record store for one entity type.
///
/// Owns the canonical collection in insertion order. Every mutation rewrites
/// the whole collection through the persistence adapter while holding the
/// write lock, so at most one mutation is in flight and readers only ever see
/// complete states. A failed write leaves the change applied in memory and is
/// reported as [`StoreError::NotDurable`].
pub struct RecordStore<T: Entity> {
    /// Collection name.
    key: String,

    /// Encoding of the persisted collection.
    encoding: Encoding,

    /// Slot holding the serialized collection.
    adapter: Box<dyn PersistenceAdapter>,

    /// Source of record timestamps.
    clock: Arc<dyn Clock>,

    /// The collection, in insertion order.
    records: RwLock<Vec<Record<T>>>,

    /// Lock for write operations to ensure atomicity.
    write_lock: Mutex<()>,

    /// Change notifications.
    subscriptions: SubscriptionManager,

    load_outcome: LoadOutcome,

    /// Size of the last blob the adapter accepted.
    persisted_bytes: AtomicU64,

    /// Set while the collection holds changes the adapter never accepted.
    dirty: AtomicBool,
}

impl<T: Entity> RecordStore<T> {
    /// Open a store over `adapter`, restoring whatever it holds.
    ///
    /// Never fails: missing, unreadable or malformed data yields an empty
    /// store and is reported through [`load_outcome`](Self::load_outcome).
    pub fn open(adapter: impl PersistenceAdapter + 'static, config: StoreConfig) -> Self {
        Self::open_with_clock(adapter, config, Arc::new(SystemClock))
    }

    /// Like [`open`](Self::open) with a custom time source.
    pub fn open_with_clock(
        adapter: impl PersistenceAdapter + 'static,
        config: StoreConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let key = config.key.unwrap_or_else(|| T::KEY.to_string());
        let (records, load_outcome, persisted_bytes) =
            Self::load_initial(&adapter, config.encoding, &key);

        tracing::info!(collection = %key, outcome = ?load_outcome, "record store opened");

        Self {
            key,
            encoding: config.encoding,
            adapter: Box::new(adapter),
            clock,
            records: RwLock::new(records),
            write_lock: Mutex::new(()),
            subscriptions: SubscriptionManager::new(),
            load_outcome,
            persisted_bytes: AtomicU64::new(persisted_bytes),
            dirty: AtomicBool::new(false),
        }
    }

    /// A store whose slot lives only in process memory.
    pub fn in_memory() -> Self {
        Self::open(MemoryAdapter::new(), StoreConfig::default())
    }

    /// Open the entity's slot inside a file storage directory.
    ///
    /// The storage's encoding wins over `config.encoding`.
    pub fn open_in(storage: &FileStorage, config: StoreConfig) -> Self {
        let key = config.key.clone().unwrap_or_else(|| T::KEY.to_string());
        let config = StoreConfig {
            key: Some(key.clone()),
            encoding: storage.encoding(),
        };
        Self::open(storage.slot(&key), config)
    }

    fn load_initial(
        adapter: &dyn PersistenceAdapter,
        encoding: Encoding,
        key: &str,
    ) -> (Vec<Record<T>>, LoadOutcome, u64) {
        let bytes = match adapter.load() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return (Vec::new(), LoadOutcome::Empty, 0),
            Err(e) => {
                tracing::warn!(
                    collection = %key,
                    error = %e,
                    "could not read saved records, starting empty"
                );
                return (Vec::new(), LoadOutcome::Unreadable(e.to_string()), 0);
            }
        };

        match encoding.decode::<T>(&bytes) {
            Ok(decoded) => {
                let total = decoded.len();
                let mut seen = HashSet::with_capacity(total);
                let records: Vec<_> = decoded.into_iter().filter(|r| seen.insert(r.id)).collect();
                let dropped_duplicates = total - records.len();
                if dropped_duplicates > 0 {
                    tracing::warn!(
                        collection = %key,
                        dropped_duplicates,
                        "saved records repeat ids"
                    );
                }
                let outcome = LoadOutcome::Loaded {
                    records: records.len(),
                    dropped_duplicates,
                };
                (records, outcome, bytes.len() as u64)
            }
            Err(e) => {
                tracing::warn!(
                    collection = %key,
                    error = %e,
                    "saved records are malformed, starting empty"
                );
                (Vec::new(), LoadOutcome::Malformed(e.to_string()), 0)
            }
        }
    }

    // --- Mutations ---

    /// Add a record. The store assigns its id and creation time.
    pub fn add(&self, fields: T) -> Result<Record<T>> {
        let _lock = self.write_lock.lock();

        let record = Record {
            id: self.fresh_id(),
            created_at: self.clock.now(),
            updated_at: None,
            fields,
        };
        self.records.write().push(record.clone());
        tracing::debug!(collection = %self.key, id = %record.id, "record added");

        let id = record.id;
        self.commit(Some(id), |collection, durable| StoreEvent::Added {
            collection,
            id,
            durable,
        })?;
        Ok(record)
    }

    /// Validate, then [`add`](Self::add). Invalid fields never reach the collection.
    pub fn add_validated(&self, fields: T) -> Result<Record<T>> {
        fields.validate()?;
        self.add(fields)
    }

    /// Replace a record's fields, keeping its id and creation time.
    ///
    /// Returns [`StoreError::RecordNotFound`] without changing anything when
    /// the id is unknown (for example a record deleted elsewhere).
    pub fn update(&self, record: Record<T>) -> Result<Record<T>> {
        let Record { id, fields, .. } = record;
        self.replace(id, move |current| *current = fields)
    }

    /// Validate, then [`update`](Self::update).
    pub fn update_validated(&self, record: Record<T>) -> Result<Record<T>> {
        record.fields.validate()?;
        self.update(record)
    }

    /// Edit a record's current fields in place. Same semantics as [`update`](Self::update).
    pub fn update_with<F>(&self, id: RecordId, edit: F) -> Result<Record<T>>
    where
        F: FnOnce(&mut T),
    {
        self.replace(id, edit)
    }

    fn replace<F>(&self, id: RecordId, edit: F) -> Result<Record<T>>
    where
        F: FnOnce(&mut T),
    {
        let _lock = self.write_lock.lock();
        let now = self.clock.now();

        let updated = {
            let mut records = self.records.write();
            let Some(current) = records.iter_mut().find(|r| r.id == id) else {
                tracing::debug!(collection = %self.key, %id, "update of unknown record");
                return Err(StoreError::RecordNotFound(id));
            };
            edit(&mut current.fields);
            current.updated_at = Some(now);
            current.clone()
        };
        tracing::debug!(collection = %self.key, %id, "record updated");

        self.commit(Some(id), |collection, durable| StoreEvent::Updated {
            collection,
            id,
            durable,
        })?;
        Ok(updated)
    }

    /// Remove a record. Returns whether it existed; removing an unknown id is a no-op.
    pub fn delete(&self, id: RecordId) -> Result<bool> {
        let _lock = self.write_lock.lock();

        let removed = {
            let mut records = self.records.write();
            match records.iter().position(|r| r.id == id) {
                Some(index) => {
                    records.remove(index);
                    true
                }
                None => false,
            }
        };
        if !removed {
            return Ok(false);
        }
        tracing::debug!(collection = %self.key, %id, "record deleted");

        self.commit(Some(id), |collection, durable| StoreEvent::Deleted {
            collection,
            id,
            durable,
        })?;
        Ok(true)
    }

    /// Remove every record. Returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let _lock = self.write_lock.lock();

        let removed = {
            let mut records = self.records.write();
            let n = records.len();
            records.clear();
            n
        };
        if removed == 0 {
            return Ok(0);
        }
        tracing::debug!(collection = %self.key, removed, "collection cleared");

        self.commit(None, |collection, durable| StoreEvent::Cleared {
            collection,
            removed,
            durable,
        })?;
        Ok(removed)
    }

    /// Write the current collection again, e.g. after a failed write.
    pub fn sync(&self) -> Result<()> {
        let _lock = self.write_lock.lock();
        self.persist_locked()
    }

    /// Id not present in the collection. Caller holds the write lock.
    fn fresh_id(&self) -> RecordId {
        let records = self.records.read();
        loop {
            let id = RecordId::new();
            if !records.iter().any(|r| r.id == id) {
                return id;
            }
        }
    }

    /// Persist, notify, and map a failed write to `NotDurable`. Caller holds the write lock.
    fn commit<F>(&self, id: Option<RecordId>, event: F) -> Result<()>
    where
        F: FnOnce(String, bool) -> StoreEvent,
    {
        let result = self.persist_locked();
        self.subscriptions.broadcast(event(self.key.clone(), result.is_ok()));

        result.map_err(|e| match e {
            StoreError::Persistence(source) => StoreError::NotDurable { id, source },
            other => other,
        })
    }

    /// Serialize the whole collection and hand it to the adapter. Caller holds the write lock.
    fn persist_locked(&self) -> Result<()> {
        let encoded = {
            let records = self.records.read();
            self.encoding.encode(&records)
        };
        let bytes = match encoded {
            Ok(bytes) => bytes,
            Err(e) => {
                self.dirty.store(true, Ordering::SeqCst);
                tracing::warn!(collection = %self.key, error = %e, "could not encode records");
                return Err(StoreError::Persistence(PersistenceError::Unencodable(
                    e.to_string(),
                )));
            }
        };

        match self.adapter.save(&bytes) {
            Ok(()) => {
                self.persisted_bytes
                    .store(bytes.len() as u64, Ordering::SeqCst);
                self.dirty.store(false, Ordering::SeqCst);
                tracing::debug!(collection = %self.key, bytes = bytes.len(), "records persisted");
                Ok(())
            }
            Err(e) => {
                self.dirty.store(true, Ordering::SeqCst);
                tracing::warn!(collection = %self.key, error = %e, "could not persist records");
                Err(StoreError::Persistence(e))
            }
        }
    }

    // --- Reads ---

    /// Snapshot of the collection in insertion order.
    pub fn all(&self) -> Vec<Record<T>> {
        self.records.read().clone()
    }

    /// Get a record by ID.
    pub fn get(&self, id: RecordId) -> Option<Record<T>> {
        self.records.read().iter().find(|r| r.id == id).cloned()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.records.read().iter().any(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Run a query against a fresh snapshot, at the store clock's "now".
    pub fn query(&self, query: &Query<Record<T>>) -> Vec<Record<T>> {
        self.query_with(query, &QueryContext::at_local(self.clock.now()))
    }

    /// Run a query against a fresh snapshot at an explicit context.
    pub fn query_with(&self, query: &Query<Record<T>>, ctx: &QueryContext) -> Vec<Record<T>> {
        query.run_with(self.all(), ctx)
    }

    /// Encoded form of the current collection, as it would be persisted.
    pub fn export(&self) -> Result<Vec<u8>> {
        self.encoding.encode(&self.records.read())
    }

    /// Store statistics.
    pub fn stats(&self) -> StoreStats {
        let records = self.records.read();
        StoreStats {
            record_count: records.len(),
            oldest_created: records.iter().map(|r| r.created_at).min(),
            newest_created: records.iter().map(|r| r.created_at).max(),
            last_modified: records.iter().map(|r| r.last_modified()).max(),
            persisted_bytes: self.persisted_bytes.load(Ordering::SeqCst),
            dirty: self.dirty.load(Ordering::SeqCst),
        }
    }

    /// Collection name.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// How the initial load went.
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Whether the collection holds changes the adapter never accepted.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    // --- Subscriptions ---

    /// Receive an event after every applied mutation from now on.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.subscription_count()
    }
}
