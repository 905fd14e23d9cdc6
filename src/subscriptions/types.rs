//! Subscription types for store change notifications.

use crate::types::RecordId;
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 1000
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            filter: SubscriptionFilter::all(),
        }
    }
}

/// Kind of change an event reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Added,
    Updated,
    Deleted,
    Cleared,
}

/// Filter criteria for subscriptions.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Event kinds to deliver (None = all kinds).
    pub kinds: Option<Vec<EventKind>>,

    /// Only events touching these records (None = any record).
    /// `Cleared` touches every record and always passes this check.
    pub record_ids: Option<Vec<RecordId>>,
}

impl SubscriptionFilter {
    /// Every change.
    pub fn all() -> Self {
        Self::default()
    }

    /// Only the given kinds of change.
    pub fn kinds(kinds: Vec<EventKind>) -> Self {
        Self {
            kinds: Some(kinds),
            ..Default::default()
        }
    }

    /// Only changes to one record (e.g. a detail screen).
    pub fn record(id: RecordId) -> Self {
        Self {
            record_ids: Some(vec![id]),
            ..Default::default()
        }
    }

    pub(crate) fn matches(&self, event: &StoreEvent) -> bool {
        let Some(kind) = event.kind() else {
            return true;
        };

        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&kind) {
                return false;
            }
        }

        match (&self.record_ids, event.record_id()) {
            (Some(ids), Some(id)) => ids.contains(&id),
            _ => true,
        }
    }
}

/// Events emitted by subscriptions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// A record was added.
    Added {
        collection: String,
        id: RecordId,
        /// False when the write behind this change failed.
        durable: bool,
    },

    /// A record was replaced.
    Updated {
        collection: String,
        id: RecordId,
        durable: bool,
    },

    /// A record was removed.
    Deleted {
        collection: String,
        id: RecordId,
        durable: bool,
    },

    /// Every record was removed.
    Cleared {
        collection: String,
        removed: usize,
        durable: bool,
    },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

impl StoreEvent {
    /// Kind of change, `None` for lifecycle events.
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            StoreEvent::Added { .. } => Some(EventKind::Added),
            StoreEvent::Updated { .. } => Some(EventKind::Updated),
            StoreEvent::Deleted { .. } => Some(EventKind::Deleted),
            StoreEvent::Cleared { .. } => Some(EventKind::Cleared),
            StoreEvent::Dropped { .. } => None,
        }
    }

    /// The record a change touched, if it touched exactly one.
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            StoreEvent::Added { id, .. }
            | StoreEvent::Updated { id, .. }
            | StoreEvent::Deleted { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Whether the change reached durable storage. Lifecycle events report true.
    pub fn is_durable(&self) -> bool {
        match self {
            StoreEvent::Added { durable, .. }
            | StoreEvent::Updated { durable, .. }
            | StoreEvent::Deleted { durable, .. }
            | StoreEvent::Cleared { durable, .. } => *durable,
            StoreEvent::Dropped { .. } => true,
        }
    }
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<StoreEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<StoreEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StoreEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<StoreEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything buffered right now, without blocking.
    pub fn drain(&self) -> Vec<StoreEvent> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn added(id: RecordId) -> StoreEvent {
        StoreEvent::Added {
            collection: "trips".into(),
            id,
            durable: true,
        }
    }

    #[test]
    fn test_filter_by_kind() {
        let filter = SubscriptionFilter::kinds(vec![EventKind::Deleted]);
        assert!(!filter.matches(&added(RecordId::new())));
        assert!(filter.matches(&StoreEvent::Deleted {
            collection: "trips".into(),
            id: RecordId::new(),
            durable: true,
        }));
    }

    #[test]
    fn test_filter_by_record() {
        let id = RecordId::new();
        let filter = SubscriptionFilter::record(id);
        assert!(filter.matches(&added(id)));
        assert!(!filter.matches(&added(RecordId::new())));
        assert!(filter.matches(&StoreEvent::Cleared {
            collection: "trips".into(),
            removed: 3,
            durable: true,
        }));
    }

    #[test]
    fn test_event_serializes_tagged() {
        let json = serde_json::to_value(added(RecordId::new())).unwrap();
        assert_eq!(json["type"], "added");
        assert_eq!(json["collection"], "trips");
    }
}
