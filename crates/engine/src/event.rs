//! Publish/subscribe event surface of the store.
//!
//! Every mutation publishes a typed [`Event`] on the store's [`EventBus`].
//! Subscribers are sessions, UI consumers, or the external cluster sync
//! layer; the core has no compile-time dependency on any of them.
//!
//! Cluster deferral works over the same bus: when clustering is enabled the
//! mutation pipeline publishes a `Cluster*` event carrying the unmodified
//! payload instead of mutating locally, and expects the sync layer to call
//! back with the force-local flag set.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tessera_core::{RowBatch, RowHandle, Value};

/// Metadata attached to a `DataUpdated` publication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateMeta {
    /// True when the whole store was rebuilt (full reset).
    pub reset: bool,
    /// The force-local flag the triggering mutation was called with.
    pub force_local: bool,
}

/// Payload of a removal publication.
///
/// `remove` reports the identifier batch it was given; `clear` reports the
/// full cache contents at the time of the call.
#[derive(Debug, Clone)]
pub enum RemovedPayload {
    /// Identifier batch passed to `remove`.
    Ids(Vec<Value>),
    /// Row handles passed along by `clear`.
    Rows(Vec<RowHandle>),
}

/// A store event with its typed payload.
#[derive(Debug, Clone)]
pub enum Event {
    /// Rows were added, updated, or rebuilt.
    DataUpdated {
        /// The rows touched by the mutation (the full cache on reset).
        rows: Vec<RowHandle>,
        /// Reset marker and force-local flag.
        meta: UpdateMeta,
    },
    /// Rows were removed or the store was cleared.
    DataRemoved {
        /// Identifier batch or row handles, as constructed by the mutation.
        payload: RemovedPayload,
        /// The force-local flag of the triggering call.
        force_local: bool,
    },
    /// Deferred add: the sync layer is expected to commit this batch.
    ClusterAdd(RowBatch),
    /// Deferred update.
    ClusterUpdate {
        /// The unmodified input batch.
        batch: RowBatch,
        /// True when the deferred call was a full reset.
        reset: bool,
    },
    /// Deferred removal, or notification of a clear.
    ClusterRemove(RemovedPayload),
}

impl Event {
    /// Stable topic name, used for logging and subscriber filtering.
    pub fn topic(&self) -> &'static str {
        match self {
            Event::DataUpdated { .. } => "data_updated",
            Event::DataRemoved { .. } => "data_removed",
            Event::ClusterAdd(_) => "cluster_add",
            Event::ClusterUpdate { .. } => "cluster_update",
            Event::ClusterRemove(_) => "cluster_remove",
        }
    }
}

/// Identifies one subscription for later removal.
pub type SubscriptionId = u64;

type Callback = Arc<dyn Fn(&Event) + Send + Sync>;

/// Named-topic publish/subscribe hub.
///
/// Callbacks are invoked synchronously, outside the subscriber-list lock, so
/// a callback may subscribe or unsubscribe without deadlocking.
#[derive(Default)]
pub struct EventBus {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Callback)>>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        EventBus::default()
    }

    /// Register a callback for every published event.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().push((id, Arc::new(callback)));
        id
    }

    /// Remove a subscription. Returns false when the id is unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.lock();
        let before = subs.len();
        subs.retain(|(sub_id, _)| *sub_id != id);
        subs.len() != before
    }

    /// Publish an event to every current subscriber.
    pub fn publish(&self, event: &Event) {
        let callbacks: Vec<Callback> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        tracing::trace!(topic = event.topic(), subscribers = callbacks.len(), "publish");
        for callback in callbacks {
            callback(event);
        }
    }

    /// Number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}
