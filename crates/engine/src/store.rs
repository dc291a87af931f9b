//! The reactive row store: mutation pipeline, eviction, and refresh.
//!
//! A [`DataStore`] owns an ordered cache of shared row handles (insertion
//! order, may transiently hold soft-removed rows) and an identifier index for
//! O(1) lookup. All mutations run to completion synchronously except the
//! coalesced ones: the garbage sweep and the two refresh operations are
//! armed against the store's clock and executed from [`DataStore::tick`].
//!
//! # Invariant
//!
//! Every non-removed reachable row has exactly one index entry. Removing a
//! row deletes its index entry immediately; the row itself stays in the cache
//! until the coalesced sweep purges it.
//!
//! # Cluster deferral
//!
//! With `cluster_sync` enabled, `add`/`update` publish a cluster event
//! carrying the unmodified payload and perform no local mutation; the
//! external sync layer is expected to call back with `force_local` set.
//! The deferral is fire-and-forget: the store keeps no pending-transaction
//! state and never retries.

use crate::event::{Event, EventBus, RemovedPayload, SubscriptionId, UpdateMeta};
use crate::schedule::{Debounce, Throttle};
use crate::session::Session;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::time::Duration;
use tessera_core::{
    Clock, Column, Resolver, Result, RowBatch, RowHandle, RowInput, Schema, SystemClock, Value,
};
use tracing::{debug, trace};

/// Fixed quiet window shared by the garbage collector and both refresh
/// operations.
pub const QUIET_WINDOW: Duration = Duration::from_millis(100);

/// Construction-time configuration of a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Logical name of this dataset instance.
    pub id: String,
    /// Identifier column used when no column sets `primary_key`.
    pub id_field: String,
    /// Initial column list.
    pub columns: Vec<Column>,
    /// Defer mutations to the external sync layer instead of applying them.
    pub cluster_sync: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            id: String::new(),
            id_field: "id".to_string(),
            columns: Vec::new(),
            cluster_sync: false,
        }
    }
}

impl StoreConfig {
    /// Configuration with the given dataset name and defaults elsewhere.
    pub fn new(id: impl Into<String>) -> Self {
        StoreConfig {
            id: id.into(),
            ..StoreConfig::default()
        }
    }

    /// Set the initial column list.
    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Set the default identifier field.
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Enable cluster deferral.
    pub fn cluster_sync(mut self) -> Self {
        self.cluster_sync = true;
        self
    }
}

/// Builder wiring a [`StoreConfig`] with the injected collaborators.
pub struct StoreBuilder {
    config: StoreConfig,
    resolver: Option<Arc<dyn Resolver>>,
    clock: Arc<dyn Clock>,
}

impl StoreBuilder {
    /// Inject the foreign-key resolver.
    pub fn resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Replace the time source (tests use a manual clock).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate the schema and build the store.
    pub fn build(self) -> Result<DataStore> {
        let schema = Schema::new(self.config.columns, &self.config.id_field)?;
        debug!(store = %self.config.id, columns = schema.len(), "store created");
        Ok(DataStore {
            id: self.config.id,
            id_field: self.config.id_field,
            schema,
            cache: Vec::new(),
            index: FxHashMap::default(),
            resolver: self.resolver,
            cluster_sync: self.config.cluster_sync,
            bus: EventBus::new(),
            clock: self.clock,
            gc: Debounce::new(QUIET_WINDOW),
            refresh_limit: Throttle::new(QUIET_WINDOW),
            refresh_all_limit: Throttle::new(QUIET_WINDOW),
            pending_refresh_all_silent: false,
            has_garbage: false,
            sessions: Vec::new(),
        })
    }
}

/// In-memory, column-oriented reactive row store.
pub struct DataStore {
    id: String,
    id_field: String,
    pub(crate) schema: Schema,
    pub(crate) cache: Vec<RowHandle>,
    pub(crate) index: FxHashMap<Value, RowHandle>,
    pub(crate) resolver: Option<Arc<dyn Resolver>>,
    cluster_sync: bool,
    bus: EventBus,
    clock: Arc<dyn Clock>,
    gc: Debounce,
    refresh_limit: Throttle,
    refresh_all_limit: Throttle,
    pending_refresh_all_silent: bool,
    has_garbage: bool,
    pub(crate) sessions: Vec<Session>,
}

impl DataStore {
    /// Start building a store from `config`.
    pub fn builder(config: StoreConfig) -> StoreBuilder {
        StoreBuilder {
            config,
            resolver: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Build a store with the default clock and no resolver.
    pub fn new(config: StoreConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Logical name of this dataset instance.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The current schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The full dataset view, including rows awaiting the sweep.
    pub fn rows(&self) -> &[RowHandle] {
        &self.cache
    }

    /// The live dataset; compacts eagerly when a sweep is pending.
    pub fn get_data(&mut self) -> &[RowHandle] {
        if self.has_garbage {
            self.collect_garbage();
        }
        &self.cache
    }

    /// O(1) identifier lookup. Soft-removed rows resolve to nothing.
    pub fn get_by_id(&self, id: &Value) -> Option<RowHandle> {
        self.index.get(id).cloned()
    }

    /// Number of rows in the cache, including rows awaiting the sweep.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// True when the cache holds no rows.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    // =========================================================================
    // Event subscription
    // =========================================================================

    /// Register a subscriber for every published event.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.bus.subscribe(callback)
    }

    /// Drop a subscription.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// The store's event bus.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // =========================================================================
    // Mutation pipeline
    // =========================================================================

    /// Add rows. Identifiers already present are idempotent no-ops: the
    /// existing row is reused, not regenerated.
    ///
    /// With clustering enabled and `force_local` unset, publishes
    /// `ClusterAdd` with the unmodified batch and mutates nothing locally.
    pub fn add(&mut self, data: impl Into<RowBatch>, force_local: bool) -> Result<Vec<RowHandle>> {
        let batch: RowBatch = data.into();
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        if self.cluster_sync && !force_local {
            trace!(store = %self.id, rows = batch.len(), "add deferred to cluster");
            self.bus.publish(&Event::ClusterAdd(batch));
            return Ok(Vec::new());
        }

        let mut touched = Vec::with_capacity(batch.len());
        for input in &batch {
            // Keyless inputs index under the null identifier, so repeated
            // keyless adds reuse one slot instead of appending duplicates.
            let key = input.key(&self.schema).unwrap_or(Value::Null);
            let row = match self.index.get(&key).cloned() {
                Some(row) => row,
                None => {
                    let row = self.materialize_row(input, None)?;
                    self.cache.push(row.clone());
                    row
                }
            };
            touched.push(row);
        }

        trace!(store = %self.id, rows = touched.len(), "add");
        if !touched.is_empty() {
            self.bus.publish(&Event::DataUpdated {
                rows: touched.clone(),
                meta: UpdateMeta {
                    reset: false,
                    force_local,
                },
            });
        }
        Ok(touched)
    }

    /// Upsert rows, or rebuild the whole store when `full_reset` is set.
    ///
    /// Non-reset upserts merge named input into existing rows in place
    /// (identity preserved); unknown identifiers are appended. A full reset
    /// discards the previous cache and index wholesale and publishes
    /// `DataUpdated` unconditionally with the reset marker.
    pub fn update(
        &mut self,
        data: impl Into<RowBatch>,
        full_reset: bool,
        force_local: bool,
    ) -> Result<Vec<RowHandle>> {
        let batch: RowBatch = data.into();

        if full_reset {
            if self.cluster_sync && !force_local {
                trace!(store = %self.id, rows = batch.len(), "reset deferred to cluster");
                self.bus.publish(&Event::ClusterUpdate { batch, reset: true });
                return Ok(Vec::new());
            }
            let rows = self.materialize_all(&batch)?;
            self.cache = rows.clone();
            debug!(store = %self.id, rows = rows.len(), "full reset");
            self.bus.publish(&Event::DataUpdated {
                rows: rows.clone(),
                meta: UpdateMeta {
                    reset: true,
                    force_local,
                },
            });
            return Ok(rows);
        }

        if batch.is_empty() {
            return Ok(Vec::new());
        }

        if self.cluster_sync && !force_local {
            trace!(store = %self.id, rows = batch.len(), "update deferred to cluster");
            self.bus.publish(&Event::ClusterUpdate {
                batch,
                reset: false,
            });
            return Ok(Vec::new());
        }

        let mut touched = Vec::with_capacity(batch.len());
        for input in &batch {
            let key = input.key(&self.schema).unwrap_or(Value::Null);
            let row = match self.index.get(&key).cloned() {
                Some(row) => self.materialize_row(input, Some(&row))?,
                None => {
                    let row = self.materialize_row(input, None)?;
                    self.cache.push(row.clone());
                    row
                }
            };
            touched.push(row);
        }

        trace!(store = %self.id, rows = touched.len(), "update");
        if !touched.is_empty() {
            self.bus.publish(&Event::DataUpdated {
                rows: touched.clone(),
                meta: UpdateMeta {
                    reset: false,
                    force_local,
                },
            });
        }
        Ok(touched)
    }

    /// Soft-remove rows by identifier and arm the coalesced sweep.
    ///
    /// With clustering enabled the cluster event fires regardless of
    /// `force_local`, and the local removal and `DataRemoved` publication
    /// happen in the same call — removal notifies both sides, unlike
    /// add/update which suppress the local path when deferring.
    pub fn remove(&mut self, ids: &[Value], force_local: bool) {
        if ids.is_empty() {
            return;
        }

        if self.cluster_sync {
            self.bus
                .publish(&Event::ClusterRemove(RemovedPayload::Ids(ids.to_vec())));
        }

        let now = self.clock.now();
        let mut flagged = 0usize;
        for id in ids {
            if let Some(row) = self.index.remove(id) {
                row.write().set_removed(true);
                self.has_garbage = true;
                self.gc.schedule(now);
                flagged += 1;
            }
        }

        trace!(store = %self.id, requested = ids.len(), flagged, "remove");
        self.bus.publish(&Event::DataRemoved {
            payload: RemovedPayload::Ids(ids.to_vec()),
            force_local,
        });
    }

    /// Empty the store. The local reset always happens, even under
    /// clustering; only the cluster notification respects `force_local`.
    pub fn clear(&mut self, force_local: bool) {
        if self.cluster_sync && !force_local {
            self.bus
                .publish(&Event::ClusterRemove(RemovedPayload::Rows(self.cache.clone())));
        }

        self.bus.publish(&Event::DataRemoved {
            payload: RemovedPayload::Rows(self.cache.clone()),
            force_local,
        });

        debug!(store = %self.id, rows = self.cache.len(), "clear");
        self.cache.clear();
        self.index.clear();
        self.has_garbage = false;
    }

    // =========================================================================
    // Column schema manager
    // =========================================================================

    /// Merge or replace the column list, then re-materialize every row under
    /// the new schema via `refresh_all`.
    pub fn update_columns(&mut self, new_columns: Vec<Column>, full_reset: bool) -> Result<()> {
        self.schema = self.schema.merge(new_columns, full_reset, &self.id_field)?;
        debug!(store = %self.id, columns = self.schema.len(), "columns updated");
        self.refresh_all(false)
    }

    // =========================================================================
    // Coalesced operations
    // =========================================================================

    /// Rebuild the whole cache with fresh row instances and publish
    /// `DataUpdated`. Leading-edge rate limited: the first call outside an
    /// active window runs immediately; calls inside the window coalesce into
    /// one trailing execution delivered by [`DataStore::tick`].
    pub fn refresh(&mut self) -> Result<()> {
        let now = self.clock.now();
        if self.refresh_limit.acquire(now) {
            self.do_refresh()
        } else {
            trace!(store = %self.id, "refresh absorbed");
            Ok(())
        }
    }

    /// Re-materialize every row in place (identity preserved) and publish
    /// `DataUpdated` unless `silent`. Rate limited like [`DataStore::refresh`];
    /// the last absorbed call's `silent` flag wins.
    pub fn refresh_all(&mut self, silent: bool) -> Result<()> {
        let now = self.clock.now();
        if self.refresh_all_limit.acquire(now) {
            self.do_refresh_all(silent)
        } else {
            trace!(store = %self.id, "refresh_all absorbed");
            self.pending_refresh_all_silent = silent;
            Ok(())
        }
    }

    /// Run any due coalesced work: the garbage sweep and trailing refresh
    /// executions. Deferred work observes store state as of this call, not
    /// as of its scheduling.
    pub fn tick(&mut self) -> Result<()> {
        let now = self.clock.now();
        if self.gc.fire(now) {
            self.collect_garbage();
        }
        if self.refresh_limit.fire_trailing(now) {
            self.do_refresh()?;
        }
        if self.refresh_all_limit.fire_trailing(now) {
            let silent = self.pending_refresh_all_silent;
            self.do_refresh_all(silent)?;
        }
        Ok(())
    }

    fn collect_garbage(&mut self) {
        if !self.has_garbage {
            return;
        }
        let before = self.cache.len();
        self.cache.retain(|row| !row.read().removed());
        self.has_garbage = false;
        debug!(store = %self.id, purged = before - self.cache.len(), "garbage sweep");
    }

    fn do_refresh(&mut self) -> Result<()> {
        let removed_position = self.schema.removed_position();
        let width = self.schema.len();
        let snapshot: Vec<Vec<Value>> = self
            .cache
            .iter()
            .map(|row| {
                let guard = row.read();
                let mut values = guard.values().to_vec();
                values.resize(width, Value::Null);
                values[removed_position] = Value::Bool(guard.removed());
                values
            })
            .collect();

        self.index.clear();
        let mut fresh = Vec::with_capacity(snapshot.len());
        for values in snapshot {
            fresh.push(self.materialize_row(&RowInput::Positional(values), None)?);
        }
        self.cache = fresh;

        debug!(store = %self.id, rows = self.cache.len(), "refresh");
        // Not a reset: only `update(.., full_reset)` carries the marker. The
        // identity discard is observable through the fresh handles.
        self.bus.publish(&Event::DataUpdated {
            rows: self.cache.clone(),
            meta: UpdateMeta::default(),
        });
        Ok(())
    }

    fn do_refresh_all(&mut self, silent: bool) -> Result<()> {
        let rows = self.cache.clone();
        self.index.clear();
        for row in &rows {
            self.materialize_in_place(row)?;
        }

        debug!(store = %self.id, rows = rows.len(), silent, "refresh_all");
        if !silent {
            self.bus.publish(&Event::DataUpdated {
                rows: self.cache.clone(),
                meta: UpdateMeta::default(),
            });
        }
        Ok(())
    }
}
