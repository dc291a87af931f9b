//! Row materialization: raw input plus column rules, in column order.
//!
//! Materializing a row happens in two passes. The first pass writes the raw
//! input: positional input replaces the storage verbatim, named input copies
//! only the fields present (partial merge). The second pass walks the column
//! list left-to-right and applies every value rule and resolve descriptor,
//! so later rules can read earlier materialized cells. The final step
//! (re)registers the row in the identifier index under its *current* key.

use crate::store::DataStore;
use rustc_hash::FxHashMap;
use tessera_core::{
    Fields, Resolver, Result, Row, RowBatch, RowHandle, RowInput, Schema, TesseraError, Value,
    ValueRule, REMOVED_COLUMN,
};

/// Run the value/resolve pass over positional storage, in column order.
fn apply_rules(schema: &Schema, resolver: Option<&dyn Resolver>, row: &mut Row) -> Result<()> {
    for (position, column) in schema.columns().iter().enumerate() {
        if let Some(rule) = &column.value {
            let value = match rule {
                ValueRule::Constant(v) => v.clone(),
                ValueRule::Computed(f) => {
                    f(&Fields::positional(schema, row.values()), &column.name)?
                }
            };
            row.set(position, value);
        }
        if let Some(descriptor) = &column.resolve {
            let resolver = resolver.ok_or_else(|| {
                TesseraError::resolve(format!(
                    "column '{}' carries a resolve rule but no resolver is configured",
                    column.name
                ))
            })?;
            let value = resolver.resolve(descriptor, &Fields::positional(schema, row.values()))?;
            row.set(position, value);
        }
    }
    Ok(())
}

impl DataStore {
    /// Materialize one row from raw input, into `existing` when given
    /// (identity preserved) or into a fresh row otherwise. Registers the
    /// result in the identifier index; when an in-place update changed the
    /// identifier, the stale entry is dropped explicitly.
    pub(crate) fn materialize_row(
        &mut self,
        input: &RowInput,
        existing: Option<&RowHandle>,
    ) -> Result<RowHandle> {
        let width = self.schema.len();
        let row = match existing {
            Some(handle) => handle.clone(),
            None => Row::with_width(width).into_handle(),
        };
        let old_key = existing.map(|handle| self.row_key(handle));

        {
            let mut guard = row.write();
            match input {
                RowInput::Positional(values) => {
                    guard.replace_raw(values.clone(), width);
                }
                RowInput::Named(map) => {
                    guard.resize(width);
                    for (position, column) in self.schema.columns().iter().enumerate() {
                        if let Some(value) = map.get(&column.name) {
                            guard.set(position, value.clone());
                        }
                    }
                }
            }

            // Raw input may carry the bookkeeping cell; keep the flag in sync.
            if let Some(Value::Bool(removed)) = guard.get(self.schema.removed_position()).cloned() {
                guard.set_removed(removed);
            }

            apply_rules(&self.schema, self.resolver.as_deref(), &mut guard)?;
        }

        let key = self.row_key(&row);
        if let Some(old_key) = old_key {
            if old_key != key {
                self.index.remove(&old_key);
            }
        }
        if !row.read().removed() {
            self.index.insert(key, row.clone());
        }
        Ok(row)
    }

    /// Materialize a full dataset into brand-new row instances, discarding
    /// prior identity and rebuilding the identifier index from scratch.
    pub(crate) fn materialize_all(&mut self, batch: &RowBatch) -> Result<Vec<RowHandle>> {
        self.index.clear();
        let mut rows = Vec::with_capacity(batch.len());
        for input in batch {
            rows.push(self.materialize_row(input, None)?);
        }
        Ok(rows)
    }

    /// Re-run the rule pass over an existing row without touching its raw
    /// input, growing the storage to the current column count first. Used
    /// after schema changes; row identity is preserved.
    pub(crate) fn materialize_in_place(&mut self, row: &RowHandle) -> Result<()> {
        {
            let mut guard = row.write();
            guard.resize(self.schema.len());
            apply_rules(&self.schema, self.resolver.as_deref(), &mut guard)?;
        }
        if !row.read().removed() {
            let key = self.row_key(row);
            self.index.insert(key, row.clone());
        }
        Ok(())
    }

    /// Apply the value/resolve pass to a named map without going through the
    /// store, for outbound payloads that need computed cells.
    pub fn render_row(
        &self,
        fields: &FxHashMap<String, Value>,
    ) -> Result<FxHashMap<String, Value>> {
        let mut out = fields.clone();
        for column in self.schema.columns() {
            if column.name == REMOVED_COLUMN {
                continue;
            }
            if let Some(rule) = &column.value {
                let value = match rule {
                    ValueRule::Constant(v) => v.clone(),
                    ValueRule::Computed(f) => f(&Fields::named(&out), &column.name)?,
                };
                out.insert(column.name.clone(), value);
            }
            if let Some(descriptor) = &column.resolve {
                let resolver = self.resolver.as_deref().ok_or_else(|| {
                    TesseraError::resolve(format!(
                        "column '{}' carries a resolve rule but no resolver is configured",
                        column.name
                    ))
                })?;
                let value = resolver.resolve(descriptor, &Fields::named(&out))?;
                out.insert(column.name.clone(), value);
            }
        }
        Ok(out)
    }

    /// Current identifier value of a row (`Null` when the cell is absent).
    pub(crate) fn row_key(&self, row: &RowHandle) -> Value {
        row.read()
            .get(self.schema.key_position())
            .cloned()
            .unwrap_or(Value::Null)
    }
}
