//! Public types for the tessera unified API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Public API types - these are what users should use
// ============================================================================

// Core value types
pub use tessera_core::Value;

// Row storage and input shapes
pub use tessera_core::{Fields, Row, RowBatch, RowHandle, RowInput};

// Schema and column definitions
pub use tessera_core::{Column, ComputedFn, ResolveDescriptor, Resolver, Schema, ValueRule};
pub use tessera_core::REMOVED_COLUMN;

// Error handling
pub use tessera_core::{Result, TesseraError};

// Time source (injectable for tests)
pub use tessera_core::{Clock, SystemClock};

// Store and lifecycle
pub use tessera_engine::{DataStore, StoreBuilder, StoreConfig, QUIET_WINDOW};

// Events
pub use tessera_engine::{Event, EventBus, RemovedPayload, SubscriptionId, UpdateMeta};

// Presentation headers
pub use tessera_engine::{HeaderColumn, SimpleHeaderColumn};

// Tree reconstruction
pub use tessera_engine::TreeNode;

// View sessions
pub use tessera_engine::{Session, SessionConfig};
