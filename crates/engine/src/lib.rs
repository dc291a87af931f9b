//! Engine of the tessera reactive row store.
//!
//! This crate implements the machinery around the core types:
//! - Mutation pipeline: add/update/remove/clear with cluster deferral
//! - Row materializer: raw input plus value/resolve rules, in column order
//! - Coalesced scheduling: debounced garbage sweep, throttled refresh
//! - Event bus: typed publications to sessions, UI, and the sync layer
//! - Tree builder: read-only hierarchy reconstruction
//! - Session factory and header accessors: the view-layer seam
//!
//! The query/view layer and the distributed transport are external
//! collaborators reached only through [`EventBus`] and [`Session`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod event;
pub mod header;
pub mod materialize;
mod schedule;
pub mod session;
pub mod store;
pub mod tree;

pub use event::{Event, EventBus, RemovedPayload, SubscriptionId, UpdateMeta};
pub use header::{header, simple_header, HeaderColumn, SimpleHeaderColumn};
pub use session::{Session, SessionConfig};
pub use store::{DataStore, StoreBuilder, StoreConfig, QUIET_WINDOW};
pub use tree::TreeNode;
