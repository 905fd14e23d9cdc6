//! In-memory slot.

use super::PersistenceAdapter;
use crate::error::PersistenceError;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Slot {
    data: Option<Vec<u8>>,
    fail_saves: bool,
    fail_loads: bool,
    save_count: usize,
}

/// A slot living in process memory.
///
/// Clones share the same slot, so a caller can keep one handle to inspect
/// what a store wrote or to inject failures.
#[derive(Clone, Debug, Default)]
pub struct MemoryAdapter {
    slot: Arc<Mutex<Slot>>,
}

impl MemoryAdapter {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with `bytes`, as if saved by an earlier session.
    pub fn with_data(bytes: impl Into<Vec<u8>>) -> Self {
        let adapter = Self::new();
        adapter.slot.lock().data = Some(bytes.into());
        adapter
    }

    /// Current contents.
    pub fn data(&self) -> Option<Vec<u8>> {
        self.slot.lock().data.clone()
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.slot.lock().fail_saves = fail;
    }

    /// Make subsequent loads fail (or succeed again).
    pub fn fail_loads(&self, fail: bool) {
        self.slot.lock().fail_loads = fail;
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.slot.lock().save_count
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError> {
        let slot = self.slot.lock();
        if slot.fail_loads {
            return Err(PersistenceError::Unavailable("memory slot load disabled".into()));
        }
        Ok(slot.data.clone())
    }

    fn save(&self, bytes: &[u8]) -> Result<(), PersistenceError> {
        let mut slot = self.slot.lock();
        if slot.fail_saves {
            return Err(PersistenceError::Unavailable("memory slot save disabled".into()));
        }
        slot.data = Some(bytes.to_vec());
        slot.save_count += 1;
        Ok(())
    }
}
