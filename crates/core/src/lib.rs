//! Core types for the tessera reactive row store.
//!
//! This crate defines the data model shared by the engine and its consumers:
//! - `Value`: scalar cell values, usable as identifier index keys
//! - `Column` / `Schema`: column descriptors with value and resolve rules
//! - `Row` / `RowHandle`: positional storage with shared in-place mutation
//! - `RowInput` / `RowBatch`: raw mutation input (positional or named)
//! - `Clock`: time source abstraction for the coalesced schedulers
//! - `TesseraError`: the flat error surface
//!
//! The engine crate (`tessera-engine`) builds the mutation pipeline,
//! materializer, and scheduling on top of these types.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod column;
pub mod error;
pub mod row;
pub mod schema;
pub mod value;

pub use clock::{Clock, SystemClock};
pub use column::{Column, ComputedFn, ResolveDescriptor, Resolver, ValueRule};
pub use error::{Result, TesseraError};
pub use row::{Fields, Row, RowBatch, RowHandle, RowInput};
pub use schema::{Schema, REMOVED_COLUMN};
pub use value::Value;

#[cfg(any(test, feature = "testing"))]
pub use clock::ManualClock;
