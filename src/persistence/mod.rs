//! Durable key-value slots that hold serialized collections.
//!
//! A store owns exactly one slot and always writes the full collection into
//! it. Implementations must replace the previous value atomically: a reader
//! sees either the old bytes or the new bytes, never a mix.
//!
//! - [`MemoryAdapter`]: in-process slot, shareable between handles
//! - [`FileStorage`] / [`FileSlot`]: one file per slot inside a locked directory

mod file;
mod memory;

pub use file::{FileAdapterConfig, FileSlot, FileStorage};
pub use memory::MemoryAdapter;

use crate::error::PersistenceError;
use std::sync::Arc;

/// The single capability a record store consumes from its environment.
pub trait PersistenceAdapter: Send + Sync {
    /// Read the slot. `Ok(None)` means nothing was ever saved.
    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Replace the slot contents with `bytes`.
    fn save(&self, bytes: &[u8]) -> Result<(), PersistenceError>;
}

impl<A: PersistenceAdapter + ?Sized> PersistenceAdapter for Arc<A> {
    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, bytes: &[u8]) -> Result<(), PersistenceError> {
        (**self).save(bytes)
    }
}

impl<A: PersistenceAdapter + ?Sized> PersistenceAdapter for Box<A> {
    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, bytes: &[u8]) -> Result<(), PersistenceError> {
        (**self).save(bytes)
    }
}
