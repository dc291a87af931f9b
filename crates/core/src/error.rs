//! Error types for the tessera row store.
//!
//! The store deliberately keeps a flat error surface: configuration problems
//! are caught at construction time, and failures raised by injected callables
//! (computed column rules, the resolver) propagate unmodified to the caller of
//! the triggering mutation. There is no retry machinery in the core.

use thiserror::Error;

/// Errors produced by the row store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TesseraError {
    /// The store configuration is invalid (bad schema, missing identifier
    /// column, duplicate primary keys).
    #[error("invalid store configuration: {0}")]
    Config(String),

    /// A computed column rule failed while materializing a row.
    #[error("computed column failed: {0}")]
    Compute(String),

    /// The injected resolver failed, or a resolve-bearing column exists but
    /// no resolver was supplied.
    #[error("resolve failed: {0}")]
    Resolve(String),
}

impl TesseraError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        TesseraError::Config(msg.into())
    }

    /// Create a computed-column error.
    pub fn compute(msg: impl Into<String>) -> Self {
        TesseraError::Compute(msg.into())
    }

    /// Create a resolve error.
    pub fn resolve(msg: impl Into<String>) -> Self {
        TesseraError::Resolve(msg.into())
    }
}

/// Result alias used throughout the tessera crates.
pub type Result<T> = std::result::Result<T, TesseraError>;
