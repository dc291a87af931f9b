//! Live column-list changes and the presentation headers derived from them.

use crate::test_utils::{field, message_store};
use tessera::{row, Column, Value};

#[test]
fn test_added_computed_column_backfills_existing_rows() {
    let (mut store, _clock) = message_store();
    store
        .add(row! { "id" => 1, "message" => "hi", "user" => 1 }, false)
        .unwrap();

    store
        .update_columns(
            vec![Column::new("shout").computed(|row, _name| {
                let message = row.field("message").and_then(Value::as_str).unwrap_or("");
                Ok(Value::Text(message.to_uppercase()))
            })],
            false,
        )
        .unwrap();

    assert_eq!(field(&store, 1, "shout"), Some(Value::Text("HI".into())));
    // The resolve rule re-ran under the merged schema as well.
    assert_eq!(
        field(&store, 1, "user_name"),
        Some(Value::Text("rafal".into()))
    );
}

#[test]
fn test_bookkeeping_column_stays_last_after_merge() {
    let (mut store, _clock) = message_store();
    store
        .update_columns(vec![Column::new("extra")], false)
        .unwrap();

    let names: Vec<&str> = store
        .schema()
        .columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names.last(), Some(&"removed"));
    assert!(names.contains(&"extra"));
}

#[test]
fn test_full_reset_replaces_column_list_wholesale() {
    let (mut store, _clock) = message_store();
    store.add(row! { "id" => 1, "user" => 1 }, false).unwrap();

    store
        .update_columns(
            vec![Column::new("id").primary_key(), Column::new("label")],
            true,
        )
        .unwrap();

    let names: Vec<&str> = store
        .schema()
        .columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["id", "label", "removed"]);
    // Existing rows survive, re-materialized under the new list.
    assert!(store.get_by_id(&Value::Int(1)).is_some());
}

#[test]
fn test_headers_skip_bookkeeping_and_hidden_columns() {
    let (mut store, _clock) = message_store();
    store
        .update_columns(vec![Column::new("internal").hidden()], false)
        .unwrap();

    let all: Vec<String> = store
        .get_header(false)
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert!(all.contains(&"internal".to_string()));
    assert!(!all.contains(&"removed".to_string()));

    let visible: Vec<String> = store
        .get_simple_header(true)
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert!(!visible.contains(&"internal".to_string()));
    assert!(visible.contains(&"message".to_string()));
}
