//! Change notifications for record stores.
//!
//! Every applied mutation (add, update, delete, clear) is broadcast to the
//! store's subscribers after it becomes visible to readers. Subscriptions
//! support:
//! - Filtering by event kind and record id
//! - Bounded buffers with slow-subscriber dropping
//!
//! # Example
//!
//! ```ignore
//! let handle = store.subscribe(SubscriptionConfig::default());
//!
//! loop {
//!     match handle.recv() {
//!         Ok(StoreEvent::Added { id, .. }) => refresh(store.get(id)),
//!         Ok(StoreEvent::Dropped { .. }) | Err(_) => break,
//!         Ok(_) => refresh_all(store.all()),
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, EventKind, StoreEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};
