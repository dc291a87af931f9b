//! Row representation and raw-input shapes.
//!
//! A [`Row`] is positional storage aligned 1:1 with the current column list,
//! plus a soft-delete flag. Rows are shared between the cache, the identifier
//! index, and subscribers through [`RowHandle`]; the handle's allocation is
//! the row's identity, preserved across in-place updates.

use crate::schema::{Schema, REMOVED_COLUMN};
use crate::value::Value;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::Arc;

/// Inline cell capacity before row storage spills to the heap.
const INLINE_CELLS: usize = 8;

/// One materialized record: positional cells plus a removed flag.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: SmallVec<[Value; INLINE_CELLS]>,
    removed: bool,
}

impl Row {
    /// Create a row of `width` null cells.
    pub fn with_width(width: usize) -> Self {
        let mut values = SmallVec::with_capacity(width);
        values.resize(width, Value::Null);
        Row {
            values,
            removed: false,
        }
    }

    /// All cells in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Cell at `position`.
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    /// Write the cell at `position`, growing the row with nulls if needed.
    pub fn set(&mut self, position: usize, value: Value) {
        if position >= self.values.len() {
            self.values.resize(position + 1, Value::Null);
        }
        self.values[position] = value;
    }

    /// Replace the entire raw storage verbatim, padded or truncated to `width`.
    pub fn replace_raw(&mut self, values: Vec<Value>, width: usize) {
        self.values.clear();
        self.values.extend(values);
        self.values.resize(width, Value::Null);
    }

    /// Grow or shrink the storage to `width`, padding with nulls.
    pub fn resize(&mut self, width: usize) {
        self.values.resize(width, Value::Null);
    }

    /// Read a cell by column name through the schema.
    pub fn field<'a>(&'a self, schema: &Schema, name: &str) -> Option<&'a Value> {
        schema.position(name).and_then(|i| self.values.get(i))
    }

    /// Soft-delete flag.
    pub fn removed(&self) -> bool {
        self.removed
    }

    /// Set the soft-delete flag.
    pub fn set_removed(&mut self, removed: bool) {
        self.removed = removed;
    }

    /// Shallow copy of the row as a named map, including the enumerable
    /// `removed` flag.
    pub fn to_object(&self, schema: &Schema) -> FxHashMap<String, Value> {
        let mut out = FxHashMap::default();
        for (i, col) in schema.columns().iter().enumerate() {
            if col.name == REMOVED_COLUMN {
                out.insert(col.name.clone(), Value::Bool(self.removed));
            } else {
                out.insert(
                    col.name.clone(),
                    self.values.get(i).cloned().unwrap_or(Value::Null),
                );
            }
        }
        out
    }

    /// Wrap this row in a shared handle.
    pub fn into_handle(self) -> RowHandle {
        Arc::new(RwLock::new(self))
    }
}

/// Shared, in-place-mutable row cell.
pub type RowHandle = Arc<RwLock<Row>>;

/// Borrowed read view over a row's fields by name.
///
/// Value rules and resolvers read through this view, either over positional
/// storage interpreted by a schema, or over a plain named map (`render_row`).
#[derive(Clone, Copy)]
pub enum Fields<'a> {
    /// Positional cells interpreted through a schema.
    Positional {
        /// Column list giving each cell its name.
        schema: &'a Schema,
        /// The cells, aligned with the schema.
        values: &'a [Value],
    },
    /// Named map, no schema involved.
    Named(&'a FxHashMap<String, Value>),
}

impl<'a> Fields<'a> {
    /// View positional cells through `schema`.
    pub fn positional(schema: &'a Schema, values: &'a [Value]) -> Self {
        Fields::Positional { schema, values }
    }

    /// View a named map.
    pub fn named(map: &'a FxHashMap<String, Value>) -> Self {
        Fields::Named(map)
    }

    /// Read a field by name.
    pub fn field(&self, name: &str) -> Option<&'a Value> {
        match self {
            Fields::Positional { schema, values } => {
                schema.position(name).and_then(|i| values.get(i))
            }
            Fields::Named(map) => map.get(name),
        }
    }
}

/// Raw input for one row.
#[derive(Debug, Clone)]
pub enum RowInput {
    /// Already column-ordered cells; replaces a row's raw storage verbatim.
    Positional(Vec<Value>),
    /// Named fields; only the fields present are written (partial merge).
    Named(FxHashMap<String, Value>),
}

impl RowInput {
    /// Build a positional input.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        RowInput::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Build a named input from field/value pairs.
    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        RowInput::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The identifier value this input carries, if any.
    pub fn key(&self, schema: &Schema) -> Option<Value> {
        match self {
            RowInput::Positional(values) => values.get(schema.key_position()).cloned(),
            RowInput::Named(map) => map.get(schema.key_name()).cloned(),
        }
    }
}

/// Build a named [`RowInput`] from field/value pairs, converting each value
/// independently.
///
/// ```
/// use tessera_core::row;
///
/// let input = row! { "id" => 1, "message" => "hi" };
/// ```
#[macro_export]
macro_rules! row {
    ( $( $name:expr => $value:expr ),* $(,)? ) => {
        $crate::RowInput::Named(
            [ $( (String::from($name), $crate::Value::from($value)) ),* ]
                .into_iter()
                .collect(),
        )
    };
}

/// A batch of row inputs; single rows normalize into a one-element batch.
#[derive(Debug, Clone, Default)]
pub struct RowBatch(Vec<RowInput>);

impl RowBatch {
    /// Empty batch.
    pub fn new() -> Self {
        RowBatch(Vec::new())
    }

    /// Number of inputs in the batch.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the batch holds no inputs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the inputs.
    pub fn iter(&self) -> std::slice::Iter<'_, RowInput> {
        self.0.iter()
    }

    /// Append one input.
    pub fn push(&mut self, input: RowInput) {
        self.0.push(input);
    }
}

impl From<RowInput> for RowBatch {
    fn from(input: RowInput) -> Self {
        RowBatch(vec![input])
    }
}

impl From<Vec<RowInput>> for RowBatch {
    fn from(inputs: Vec<RowInput>) -> Self {
        RowBatch(inputs)
    }
}

impl FromIterator<RowInput> for RowBatch {
    fn from_iter<I: IntoIterator<Item = RowInput>>(iter: I) -> Self {
        RowBatch(iter.into_iter().collect())
    }
}

impl IntoIterator for RowBatch {
    type Item = RowInput;
    type IntoIter = std::vec::IntoIter<RowInput>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RowBatch {
    type Item = &'a RowInput;
    type IntoIter = std::slice::Iter<'a, RowInput>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
