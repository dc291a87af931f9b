//! Parent/child hierarchy reconstruction over the current rows.
//!
//! Read-only and rebuilt fresh per call: rows are grouped by their parent
//! field value once, and the group map is passed through the recursion. A row
//! that is its own parent is treated as a root and never descended into.

use crate::store::DataStore;
use rustc_hash::FxHashMap;
use tessera_core::{RowHandle, Value};

/// One node of a reconstructed hierarchy: a shallow copy of the row's fields
/// plus its attached children.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// The row's fields by name, including the enumerable `removed` flag.
    pub fields: FxHashMap<String, Value>,
    /// Child nodes, in cache order.
    pub children: Vec<TreeNode>,
    /// True when no children were attached.
    pub leaf: bool,
}

impl DataStore {
    /// Reconstruct the hierarchy rooted at `root_id`, linking rows through
    /// `parent_field`. Returns `None` when no row matches `root_id`.
    pub fn build_tree(&self, root_id: &Value, parent_field: &str) -> Option<TreeNode> {
        let parent_position = self.schema.position(parent_field);
        let mut groups: FxHashMap<Value, Vec<RowHandle>> = FxHashMap::default();
        for row in &self.cache {
            let parent = parent_position
                .and_then(|position| row.read().get(position).cloned())
                .unwrap_or(Value::Null);
            groups.entry(parent).or_default().push(row.clone());
        }
        self.tree_node(root_id, parent_position, &groups)
    }

    fn tree_node(
        &self,
        id: &Value,
        parent_position: Option<usize>,
        groups: &FxHashMap<Value, Vec<RowHandle>>,
    ) -> Option<TreeNode> {
        let root = self.index.get(id)?;
        let fields = root.read().to_object(&self.schema);

        let key_position = self.schema.key_position();
        let mut children = Vec::new();
        if let Some(group) = groups.get(id) {
            for child in group {
                let (child_id, child_parent) = {
                    let guard = child.read();
                    (
                        guard.get(key_position).cloned().unwrap_or(Value::Null),
                        parent_position
                            .and_then(|position| guard.get(position).cloned())
                            .unwrap_or(Value::Null),
                    )
                };
                // Self-parenting rows are roots; descending would recurse
                // forever.
                if child_id != child_parent {
                    if let Some(node) = self.tree_node(&child_id, parent_position, groups) {
                        children.push(node);
                    }
                }
            }
        }

        let leaf = children.is_empty();
        Some(TreeNode {
            fields,
            children,
            leaf,
        })
    }
}
