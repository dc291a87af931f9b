//! Coalesced maintenance driven through a manual clock.

use crate::test_utils::{event_counter, message_store};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tessera::{row, Column, Event, Value, QUIET_WINDOW};

#[test]
fn test_sweep_waits_for_a_quiet_window() {
    let (mut store, clock) = message_store();
    for id in 1..=3i64 {
        store.add(row! { "id" => id }, false).unwrap();
    }

    store.remove(&[Value::Int(1)], false);
    clock.advance(QUIET_WINDOW / 2);
    store.remove(&[Value::Int(2)], false);

    // The first deadline was pushed back by the second removal.
    clock.advance(QUIET_WINDOW / 2);
    store.tick().unwrap();
    assert_eq!(store.rows().len(), 3);

    clock.advance(QUIET_WINDOW);
    store.tick().unwrap();
    assert_eq!(store.rows().len(), 1);
}

#[test]
fn test_refresh_burst_runs_twice_total() {
    let (mut store, clock) = message_store();
    store.add(row! { "id" => 1 }, false).unwrap();

    let updates = event_counter(&store, |event| matches!(event, Event::DataUpdated { .. }));

    store.refresh().unwrap(); // leading edge
    store.refresh().unwrap(); // absorbed
    store.refresh().unwrap(); // absorbed
    assert_eq!(updates.load(Ordering::SeqCst), 1);

    clock.advance(QUIET_WINDOW + Duration::from_millis(20));
    store.tick().unwrap(); // single trailing execution
    assert_eq!(updates.load(Ordering::SeqCst), 2);

    clock.advance(QUIET_WINDOW + Duration::from_millis(20));
    store.tick().unwrap();
    assert_eq!(updates.load(Ordering::SeqCst), 2);
}

#[test]
fn test_absorbed_schema_refresh_lands_on_tick() {
    let (mut store, clock) = message_store();
    store.add(row! { "id" => 1 }, false).unwrap();
    let row = store.get_by_id(&Value::Int(1)).unwrap();

    store
        .update_columns(vec![Column::new("first")], false)
        .unwrap();
    let width_after_first = row.read().values().len();

    // Inside the window: the schema merges now, the re-materialization is
    // absorbed until the trailing tick.
    store
        .update_columns(vec![Column::new("second")], false)
        .unwrap();
    assert_eq!(row.read().values().len(), width_after_first);
    assert!(store.schema().position("second").is_some());

    clock.advance(QUIET_WINDOW + Duration::from_millis(20));
    store.tick().unwrap();
    assert_eq!(row.read().values().len(), store.schema().len());
}

#[test]
fn test_refresh_after_window_is_immediate_again() {
    let (mut store, clock) = message_store();
    store.add(row! { "id" => 1 }, false).unwrap();

    let updates = event_counter(&store, |event| matches!(event, Event::DataUpdated { .. }));

    store.refresh().unwrap();
    clock.advance(QUIET_WINDOW + Duration::from_millis(20));
    store.refresh().unwrap();
    assert_eq!(updates.load(Ordering::SeqCst), 2);
}
