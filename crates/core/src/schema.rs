//! Ordered column list with a resolved identifier position.
//!
//! Construction guarantees two invariants that the store relies on:
//! exactly one `removed` bookkeeping column is present, and the identifier
//! column (the `primary_key` column, or a configured default field) exists at
//! a known position. Malformed schemas fail fast with a configuration error
//! instead of yielding undefined identifier resolution.

use crate::column::Column;
use crate::error::{Result, TesseraError};

/// Name of the implicit soft-delete bookkeeping column.
pub const REMOVED_COLUMN: &str = "removed";

/// The current column list plus the resolved identifier position.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<Column>,
    key_position: usize,
}

impl Schema {
    /// Build a schema from a column list.
    ///
    /// The identifier column is the unique `primary_key` column when one is
    /// present, otherwise the column named `default_id_field`. A `removed`
    /// bookkeeping column is appended when absent; the presence check is an
    /// explicit not-found comparison, so a `removed` column at position 0 is
    /// never duplicated.
    ///
    /// # Errors
    ///
    /// `Config` when more than one column sets `primary_key`, or when the
    /// identifier column is not present in the list.
    pub fn new(mut columns: Vec<Column>, default_id_field: &str) -> Result<Self> {
        if columns.iter().all(|c| c.name != REMOVED_COLUMN) {
            columns.push(Column::new(REMOVED_COLUMN).column_type("bool"));
        }

        let mut primaries = columns.iter().filter(|c| c.primary_key);
        let key_name = match (primaries.next(), primaries.next()) {
            (Some(_), Some(second)) => {
                return Err(TesseraError::config(format!(
                    "more than one primary key column (second is '{}')",
                    second.name
                )));
            }
            (Some(first), None) => first.name.clone(),
            (None, None) => default_id_field.to_string(),
            // An iterator cannot yield `None` followed by `Some`.
            (None, Some(_)) => unreachable!(),
        };

        let key_position = columns
            .iter()
            .position(|c| c.name == key_name)
            .ok_or_else(|| {
                TesseraError::config(format!(
                    "identifier column '{key_name}' is not present in the schema"
                ))
            })?;

        Ok(Schema {
            columns,
            key_position,
        })
    }

    /// The ordered column list.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns, including the `removed` bookkeeping column.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the schema has no columns. Never true for a constructed
    /// schema, which always carries the `removed` column.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of `name` in the column list.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Position of the identifier column.
    pub fn key_position(&self) -> usize {
        self.key_position
    }

    /// Name of the identifier column.
    pub fn key_name(&self) -> &str {
        &self.columns[self.key_position].name
    }

    /// Position of the `removed` bookkeeping column.
    pub fn removed_position(&self) -> usize {
        // Present by construction.
        self.columns
            .iter()
            .position(|c| c.name == REMOVED_COLUMN)
            .unwrap_or(self.columns.len().saturating_sub(1))
    }

    /// Merge `new_columns` into this schema, or replace it wholesale.
    ///
    /// When `full_reset` is false: every existing column whose name appears in
    /// `new_columns` is replaced by the (one or more) matching new entries,
    /// unmatched existing columns are kept, and new entries matching nothing
    /// are appended. The result is re-validated, so the identifier position is
    /// recomputed and the `removed` column stays unique.
    pub fn merge(
        &self,
        new_columns: Vec<Column>,
        full_reset: bool,
        default_id_field: &str,
    ) -> Result<Schema> {
        if full_reset {
            return Schema::new(new_columns, default_id_field);
        }

        // The bookkeeping column is dropped here and re-appended by
        // `Schema::new`, keeping it in final position after appends.
        let mut merged = Vec::with_capacity(self.columns.len() + new_columns.len());
        for existing in &self.columns {
            if existing.name == REMOVED_COLUMN {
                continue;
            }
            let matches: Vec<&Column> = new_columns
                .iter()
                .filter(|c| c.name == existing.name)
                .collect();
            if matches.is_empty() {
                merged.push(existing.clone());
            } else {
                merged.extend(matches.into_iter().cloned());
            }
        }
        for candidate in &new_columns {
            if self.columns.iter().all(|c| c.name != candidate.name) {
                merged.push(candidate.clone());
            }
        }

        Schema::new(merged, default_id_field)
    }
}
