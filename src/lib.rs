//! Tessera: a reactive, in-memory, column-oriented row store.
//!
//! Rows live in an ordered cache of shared handles and an identifier index.
//! Columns can carry value rules (constants or computed functions) and
//! foreign-key resolve descriptors that the store applies on every
//! materialization. Mutations publish typed events; expensive maintenance
//! (garbage sweep, refresh) is coalesced against an injectable clock.
//!
//! # Quick start
//!
//! ```
//! use tessera::{Column, DataStore, StoreConfig, Value};
//!
//! let mut store = DataStore::new(
//!     StoreConfig::new("messages").columns(vec![
//!         Column::new("id").primary_key(),
//!         Column::new("message"),
//!     ]),
//! )?;
//!
//! store.add(tessera::row! { "id" => 1, "message" => "hello" }, false)?;
//! assert_eq!(store.len(), 1);
//! assert!(store.get_by_id(&Value::Int(1)).is_some());
//! # Ok::<(), tessera::TesseraError>(())
//! ```
//!
//! The query/view layer and any distributed transport are external
//! collaborators: they attach through [`DataStore::subscribe`] and
//! [`DataStore::create_session`], never through internal state.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;

pub use types::*;

// The row! macro is exported from the core crate root.
pub use tessera_core::row;
