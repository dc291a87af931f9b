//! Column descriptors: the schema entry for a single field.
//!
//! A column names a position in every row's storage and optionally carries a
//! value rule (constant or computed) and a resolve descriptor for
//! foreign-key-style lookups handled by an externally injected [`Resolver`].

use crate::error::Result;
use crate::row::Fields;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Signature of a computed-column rule.
///
/// Receives a read view of the row being materialized plus the column name,
/// and may read already-materialized earlier columns (evaluation is strictly
/// left-to-right). Errors abort the row's materialization.
pub type ComputedFn = Arc<dyn Fn(&Fields<'_>, &str) -> Result<Value> + Send + Sync>;

/// How a column's value is produced at materialization time.
#[derive(Clone)]
pub enum ValueRule {
    /// The column always materializes to this constant, irrespective of input.
    Constant(Value),
    /// The column is computed from the row at every materialization.
    Computed(ComputedFn),
}

impl fmt::Debug for ValueRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRule::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            ValueRule::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Join descriptor interpreted by the injected [`Resolver`].
///
/// The fields are forwarded verbatim; the core attaches no meaning to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveDescriptor {
    /// Name of the column on this row holding the lookup value.
    pub underlying_name: String,
    /// Name of the table the resolver should look into.
    pub children_table: String,
    /// Field matched against the lookup value in the foreign table.
    pub value_field: String,
    /// Field whose value is placed into the resolved cell.
    pub display_field: String,
}

/// Externally injected foreign-key resolver.
///
/// Invoked once per resolve-bearing column per materialization of a row.
/// An error aborts that row's materialization and propagates to the caller
/// of the triggering mutation; the core never catches it.
pub trait Resolver: Send + Sync {
    /// Produce the cell value for `descriptor` given the row being built.
    fn resolve(&self, descriptor: &ResolveDescriptor, row: &Fields<'_>) -> Result<Value>;
}

impl<F> Resolver for F
where
    F: Fn(&ResolveDescriptor, &Fields<'_>) -> Result<Value> + Send + Sync,
{
    fn resolve(&self, descriptor: &ResolveDescriptor, row: &Fields<'_>) -> Result<Value> {
        self(descriptor, row)
    }
}

/// Schema entry defining one field of the store.
#[derive(Clone, Default)]
pub struct Column {
    /// Unique field name.
    pub name: String,
    /// Marks the identifier column. At most one column may set this.
    pub primary_key: bool,
    /// Opaque type tag, not interpreted by the core.
    pub column_type: Option<String>,
    /// Excluded from headers when hidden columns are filtered out.
    pub hidden: bool,
    /// Optional constant or computed value rule.
    pub value: Option<ValueRule>,
    /// Optional join descriptor handled by the injected resolver.
    pub resolve: Option<ResolveDescriptor>,
    /// Opaque aggregation tag forwarded to the view layer.
    pub aggregator: Option<String>,
}

impl Column {
    /// Create a plain column with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Column {
            name: name.into(),
            ..Column::default()
        }
    }

    /// Mark this column as the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Set the opaque column type tag.
    pub fn column_type(mut self, ty: impl Into<String>) -> Self {
        self.column_type = Some(ty.into());
        self
    }

    /// Hide this column from filtered headers.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Materialize this column to a constant, irrespective of input.
    pub fn constant(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(ValueRule::Constant(value.into()));
        self
    }

    /// Compute this column from the row at every materialization.
    pub fn computed<F>(mut self, f: F) -> Self
    where
        F: Fn(&Fields<'_>, &str) -> Result<Value> + Send + Sync + 'static,
    {
        self.value = Some(ValueRule::Computed(Arc::new(f)));
        self
    }

    /// Resolve this column through the injected resolver.
    pub fn resolve(mut self, descriptor: ResolveDescriptor) -> Self {
        self.resolve = Some(descriptor);
        self
    }

    /// Set the opaque aggregator tag.
    pub fn aggregator(mut self, agg: impl Into<String>) -> Self {
        self.aggregator = Some(agg.into());
        self
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("primary_key", &self.primary_key)
            .field("column_type", &self.column_type)
            .field("hidden", &self.hidden)
            .field("value", &self.value)
            .field("resolve", &self.resolve)
            .field("aggregator", &self.aggregator)
            .finish()
    }
}
