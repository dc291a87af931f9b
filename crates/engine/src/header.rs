//! Presentation descriptors derived from the current column list.
//!
//! Stateless: headers are computed fresh from the schema on every call. The
//! `removed` bookkeeping column never appears in a header.

use crate::store::DataStore;
use serde::Serialize;
use tessera_core::{Schema, REMOVED_COLUMN};

/// Full presentation descriptor for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderColumn {
    /// Column name.
    pub name: String,
    /// Opaque type tag.
    pub column_type: Option<String>,
    /// True for the identifier column.
    pub primary_key: bool,
    /// Opaque aggregation tag for the view layer.
    pub aggregator: Option<String>,
}

/// Minimal presentation descriptor for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleHeaderColumn {
    /// Column name.
    pub name: String,
    /// Opaque type tag.
    pub column_type: Option<String>,
}

/// Full header for `schema`, skipping the bookkeeping column and,
/// optionally, hidden columns.
pub fn header(schema: &Schema, exclude_hidden: bool) -> Vec<HeaderColumn> {
    schema
        .columns()
        .iter()
        .filter(|c| c.name != REMOVED_COLUMN && !(exclude_hidden && c.hidden))
        .map(|c| HeaderColumn {
            name: c.name.clone(),
            column_type: c.column_type.clone(),
            primary_key: c.primary_key,
            aggregator: c.aggregator.clone(),
        })
        .collect()
}

/// Minimal header for `schema`.
pub fn simple_header(schema: &Schema, exclude_hidden: bool) -> Vec<SimpleHeaderColumn> {
    schema
        .columns()
        .iter()
        .filter(|c| c.name != REMOVED_COLUMN && !(exclude_hidden && c.hidden))
        .map(|c| SimpleHeaderColumn {
            name: c.name.clone(),
            column_type: c.column_type.clone(),
        })
        .collect()
}

impl DataStore {
    /// Full presentation header for the current column list.
    pub fn get_header(&self, exclude_hidden: bool) -> Vec<HeaderColumn> {
        header(self.schema(), exclude_hidden)
    }

    /// Minimal presentation header for the current column list.
    pub fn get_simple_header(&self, exclude_hidden: bool) -> Vec<SimpleHeaderColumn> {
        simple_header(self.schema(), exclude_hidden)
    }
}
