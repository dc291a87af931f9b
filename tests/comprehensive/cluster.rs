//! Cluster deferral: add/update hand off to the sync layer, remove and
//! clear keep the local store live.

use crate::test_utils::{field, message_columns, user_resolver};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tessera::{row, DataStore, Event, RowBatch, StoreConfig, Value};

fn cluster_store() -> DataStore {
    DataStore::builder(
        StoreConfig::new("messages")
            .columns(message_columns())
            .cluster_sync(),
    )
    .resolver(user_resolver())
    .build()
    .unwrap()
}

/// Capture the batch of every `ClusterAdd` publication.
fn capture_cluster_add(store: &DataStore) -> Arc<Mutex<Option<RowBatch>>> {
    let slot: Arc<Mutex<Option<RowBatch>>> = Arc::new(Mutex::new(None));
    let inner = slot.clone();
    store.subscribe(move |event| {
        if let Event::ClusterAdd(batch) = event {
            *inner.lock().unwrap() = Some(batch.clone());
        }
    });
    slot
}

#[test]
fn test_add_defers_and_round_trips() {
    let mut store = cluster_store();
    let captured = capture_cluster_add(&store);

    let touched = store
        .add(row! { "id" => 1, "message" => "hi", "user" => 1 }, false)
        .unwrap();
    assert!(touched.is_empty());
    assert_eq!(store.len(), 0);

    // The sync layer echoes the unmodified batch back with force_local.
    let batch = captured.lock().unwrap().take().unwrap();
    store.add(batch, true).unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(
        field(&store, 1, "user_name"),
        Some(Value::Text("rafal".into()))
    );
}

#[test]
fn test_force_local_add_skips_deferral() {
    let mut store = cluster_store();
    let captured = capture_cluster_add(&store);

    store.add(row! { "id" => 1 }, true).unwrap();
    assert_eq!(store.len(), 1);
    assert!(captured.lock().unwrap().is_none());
}

#[test]
fn test_update_defers_with_reset_marker() {
    let mut store = cluster_store();
    store.add(row! { "id" => 1 }, true).unwrap();

    let resets = crate::test_utils::event_counter(&store, |event| {
        matches!(event, Event::ClusterUpdate { reset: true, .. })
    });

    let touched = store.update(vec![row! { "id" => 2 }], true, false).unwrap();
    assert!(touched.is_empty());
    assert_eq!(resets.load(Ordering::SeqCst), 1);
    // Nothing was applied locally.
    assert!(store.get_by_id(&Value::Int(1)).is_some());
    assert!(store.get_by_id(&Value::Int(2)).is_none());
}

#[test]
fn test_remove_notifies_both_sides() {
    let mut store = cluster_store();
    store.add(row! { "id" => 1 }, true).unwrap();

    let cluster = crate::test_utils::event_counter(&store, |event| {
        matches!(event, Event::ClusterRemove(_))
    });
    let local = crate::test_utils::event_counter(&store, |event| {
        matches!(event, Event::DataRemoved { .. })
    });

    store.remove(&[Value::Int(1)], false);

    // Unlike add/update there is no deferral: the row is hidden at once and
    // both the cluster and the local subscribers hear about it.
    assert!(store.get_by_id(&Value::Int(1)).is_none());
    assert_eq!(cluster.load(Ordering::SeqCst), 1);
    assert_eq!(local.load(Ordering::SeqCst), 1);
}

#[test]
fn test_clear_always_resets_locally() {
    let mut store = cluster_store();
    store.add(row! { "id" => 1 }, true).unwrap();

    store.clear(false);
    assert_eq!(store.len(), 0);
    assert!(store.get_by_id(&Value::Int(1)).is_none());
}
