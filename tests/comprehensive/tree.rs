//! Hierarchy reconstruction over a comment thread.

use tessera::{row, Column, DataStore, StoreConfig, Value};

fn comment_store() -> DataStore {
    let mut store = DataStore::new(StoreConfig::new("comments").columns(vec![
        Column::new("id").primary_key(),
        Column::new("parent"),
        Column::new("body"),
    ]))
    .unwrap();

    // Row 1 is its own parent, the conventional root marker.
    store
        .add(
            vec![
                row! { "id" => 1, "parent" => 1, "body" => "root" },
                row! { "id" => 2, "parent" => 1, "body" => "reply" },
                row! { "id" => 3, "parent" => 2, "body" => "nested" },
                row! { "id" => 4, "parent" => 1, "body" => "sibling" },
            ],
            false,
        )
        .unwrap();
    store
}

#[test]
fn test_thread_reconstruction() {
    let store = comment_store();
    let root = store.build_tree(&Value::Int(1), "parent").unwrap();

    assert_eq!(root.fields.get("body"), Some(&Value::Text("root".into())));
    assert_eq!(root.children.len(), 2);
    assert!(!root.leaf);

    let reply = &root.children[0];
    assert_eq!(reply.fields.get("id"), Some(&Value::Int(2)));
    assert_eq!(reply.children.len(), 1);
    assert_eq!(reply.children[0].fields.get("id"), Some(&Value::Int(3)));
    assert!(reply.children[0].leaf);

    let sibling = &root.children[1];
    assert_eq!(sibling.fields.get("id"), Some(&Value::Int(4)));
    assert!(sibling.leaf);
}

#[test]
fn test_removed_row_prunes_its_subtree() {
    let mut store = comment_store();
    store.remove(&[Value::Int(2)], false);

    let root = store.build_tree(&Value::Int(1), "parent").unwrap();
    let ids: Vec<&Value> = root
        .children
        .iter()
        .filter_map(|c| c.fields.get("id"))
        .collect();
    // Row 2 and everything beneath it is gone; row 4 remains.
    assert_eq!(ids, vec![&Value::Int(4)]);
}

#[test]
fn test_node_fields_carry_removed_flag() {
    let store = comment_store();
    let root = store.build_tree(&Value::Int(1), "parent").unwrap();
    assert_eq!(root.fields.get("removed"), Some(&Value::Bool(false)));
}

#[test]
fn test_unknown_root_yields_nothing() {
    let store = comment_store();
    assert!(store.build_tree(&Value::Int(42), "parent").is_none());
}
