//! Session factory: the narrow seam to the external query/view layer.
//!
//! A session is an opaque view over the store — filtering, sorting, grouping
//! and aggregation all live in the external collaborator. The core only
//! mints a handle bound to this store, forwards the caller's configuration
//! unchanged, and keeps the handle registered.

use crate::store::DataStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Caller-supplied view configuration, forwarded uninterpreted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Explicit session id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Name of the table the view reads.
    #[serde(default)]
    pub table: Option<String>,
    /// View column list, opaque to the core.
    #[serde(default)]
    pub columns: serde_json::Value,
    /// Filter description, opaque to the core.
    #[serde(default)]
    pub filter: serde_json::Value,
    /// Sort description, opaque to the core.
    #[serde(default)]
    pub sort: serde_json::Value,
}

#[derive(Debug)]
struct SessionInner {
    id: String,
    store_id: String,
    config: SessionConfig,
}

/// Opaque view handle bound to a store.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// The session id (caller-supplied or generated).
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Name of the store this session is bound to.
    pub fn store_id(&self) -> &str {
        &self.inner.store_id
    }

    /// The configuration exactly as supplied.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }
}

impl DataStore {
    /// Create a view session bound to this store. The configuration is
    /// forwarded unchanged; an id is generated when the caller supplied none.
    pub fn create_session(&mut self, config: SessionConfig) -> Session {
        let id = config
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let session = Session {
            inner: Arc::new(SessionInner {
                id,
                store_id: self.id().to_string(),
                config,
            }),
        };
        self.sessions.push(session.clone());
        session
    }

    /// All sessions created on this store.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }
}
