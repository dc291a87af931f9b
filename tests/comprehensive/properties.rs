//! Property tests over merge semantics and index consistency.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use tessera::{Column, DataStore, RowInput, StoreConfig, Value};

fn plain_store() -> DataStore {
    DataStore::new(StoreConfig::new("props").columns(vec![
        Column::new("id").primary_key(),
        Column::new("a"),
        Column::new("b"),
        Column::new("c"),
    ]))
    .unwrap()
}

proptest! {
    /// A sequence of named updates against one row behaves like map inserts:
    /// the latest write per field wins and untouched fields survive.
    #[test]
    fn prop_named_updates_merge_like_a_map(
        updates in proptest::collection::vec(
            proptest::collection::hash_map("[abc]", any::<i64>(), 0..3),
            1..20,
        ),
    ) {
        let mut store = plain_store();
        store.add(RowInput::named([("id", 1i64)]), false).unwrap();

        let mut model: HashMap<String, i64> = HashMap::new();
        for update in updates {
            let mut input: Vec<(String, Value)> = vec![("id".into(), Value::Int(1))];
            for (name, value) in &update {
                input.push((name.clone(), Value::Int(*value)));
                model.insert(name.clone(), *value);
            }
            store.update(RowInput::named(input), false, false).unwrap();
        }

        let row = store.get_by_id(&Value::Int(1)).unwrap();
        let guard = row.read();
        for name in ["a", "b", "c"] {
            let expected = model.get(name).map(|v| Value::Int(*v)).unwrap_or(Value::Null);
            let actual = guard
                .field(store.schema(), name)
                .cloned()
                .unwrap_or(Value::Null);
            prop_assert_eq!(actual, expected);
        }
    }

    /// Whatever the interleaving of adds and removes, the identifier index
    /// resolves exactly the live identifiers.
    #[test]
    fn prop_index_matches_live_set(
        ops in proptest::collection::vec((any::<bool>(), 0i64..8), 1..40),
    ) {
        let mut store = plain_store();
        let mut live: HashSet<i64> = HashSet::new();

        for (add, id) in ops {
            if add {
                store.add(RowInput::named([("id", id)]), false).unwrap();
                live.insert(id);
            } else {
                store.remove(&[Value::Int(id)], false);
                live.remove(&id);
            }
        }

        for id in 0..8i64 {
            prop_assert_eq!(
                store.get_by_id(&Value::Int(id)).is_some(),
                live.contains(&id)
            );
        }
    }
}
