//! Shared fixtures: a messages store joined to a fixed user table.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tessera::{
    Column, DataStore, Event, Fields, ResolveDescriptor, Resolver, Result, StoreConfig, Value,
};
use tessera_core::ManualClock;

/// Resolver joining the `user` column against a fixed two-row user table.
pub fn user_resolver() -> Arc<dyn Resolver> {
    Arc::new(
        move |descriptor: &ResolveDescriptor, row: &Fields<'_>| -> Result<Value> {
            Ok(match row.field(&descriptor.underlying_name) {
                Some(Value::Int(1)) => Value::Text("rafal".into()),
                Some(Value::Int(2)) => Value::Text("daniel".into()),
                _ => Value::Null,
            })
        },
    )
}

pub fn message_columns() -> Vec<Column> {
    vec![
        Column::new("id").primary_key().column_type("number"),
        Column::new("message").column_type("text"),
        Column::new("user").column_type("number"),
        Column::new("user_name").resolve(ResolveDescriptor {
            underlying_name: "user".into(),
            children_table: "users".into(),
            value_field: "id".into(),
            display_field: "name".into(),
        }),
    ]
}

/// Install the test tracing subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A messages store with the user resolver and a manually driven clock.
pub fn message_store() -> (DataStore, Arc<ManualClock>) {
    init_tracing();
    let clock = Arc::new(ManualClock::new());
    let store = DataStore::builder(StoreConfig::new("messages").columns(message_columns()))
        .resolver(user_resolver())
        .clock(clock.clone())
        .build()
        .unwrap();
    (store, clock)
}

/// Count published events matching `predicate`.
pub fn event_counter(
    store: &DataStore,
    predicate: impl Fn(&Event) -> bool + Send + Sync + 'static,
) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let inner = count.clone();
    store.subscribe(move |event| {
        if predicate(event) {
            inner.fetch_add(1, Ordering::SeqCst);
        }
    });
    count
}

/// Read one field of the row indexed under `id`.
pub fn field(store: &DataStore, id: i64, name: &str) -> Option<Value> {
    store
        .get_by_id(&Value::Int(id))
        .and_then(|row| row.read().field(store.schema(), name).cloned())
}
