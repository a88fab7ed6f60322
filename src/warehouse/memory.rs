//! In-memory warehouse
//!
//! Records every statement and keeps a row count per table. Batches can be
//! made to fail and new tables can be kept invisible for a number of probes,
//! which is enough to exercise the loader end to end without a network.

use super::client::{Connector, WarehouseClient};
use super::target::WarehouseTarget;
use super::types::{InsertOutcome, Namespace, TableHandle};
use crate::dialect::{InsertBody, InsertPayload, Warehouse};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct MemoryState {
    statements: Vec<(Warehouse, String)>,
    tables: HashMap<(Warehouse, String), usize>,
    insert_calls: usize,
    failing_inserts: HashSet<usize>,
    hidden_probes: u32,
    probes: u32,
    create_error: Option<String>,
}

/// Shared in-memory store; clones see the same state
#[derive(Debug, Clone, Default)]
pub struct MemoryWarehouse {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryWarehouse {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the n-th insert call (0-based, counted across all tables) fail
    #[must_use]
    pub fn fail_insert(self, index: usize) -> Self {
        self.lock().failing_inserts.insert(index);
        self
    }

    /// Report new tables as missing for the first `probes` readiness probes
    #[must_use]
    pub fn hide_tables_for(self, probes: u32) -> Self {
        self.lock().hidden_probes = probes;
        self
    }

    /// Make every table creation fail with `message`
    #[must_use]
    pub fn fail_table_creation(self, message: impl Into<String>) -> Self {
        self.lock().create_error = Some(message.into());
        self
    }

    /// A client for one warehouse backed by this store
    pub fn client(&self, warehouse: Warehouse, namespace: Namespace) -> MemoryClient {
        MemoryClient {
            store: self.clone(),
            warehouse,
            namespace,
            prefix: Vec::new(),
        }
    }

    /// Rows currently in a table, `None` if it was never created
    pub fn row_count(&self, warehouse: Warehouse, table: &str) -> Option<usize> {
        self.lock()
            .tables
            .get(&(warehouse, table.to_string()))
            .copied()
    }

    /// Statements executed against a warehouse, in order
    pub fn statements(&self, warehouse: Warehouse) -> Vec<String> {
        self.lock()
            .statements
            .iter()
            .filter(|(w, _)| *w == warehouse)
            .map(|(_, s)| s.clone())
            .collect()
    }

    /// Readiness probes seen so far
    pub fn probe_count(&self) -> u32 {
        self.lock().probes
    }
}

impl Connector for MemoryWarehouse {
    fn connect(&self, target: &WarehouseTarget) -> Result<Box<dyn WarehouseClient>> {
        let mut client = self.client(target.warehouse(), target.namespace());
        client.prefix = target
            .table_prefix()
            .into_iter()
            .map(String::from)
            .collect();
        Ok(Box::new(client))
    }
}

/// One warehouse's view of a [`MemoryWarehouse`]
#[derive(Debug, Clone)]
pub struct MemoryClient {
    store: MemoryWarehouse,
    warehouse: Warehouse,
    namespace: Namespace,
    prefix: Vec<String>,
}

#[async_trait]
impl WarehouseClient for MemoryClient {
    fn warehouse(&self) -> Warehouse {
        self.warehouse
    }

    fn namespace(&self) -> Namespace {
        self.namespace.clone()
    }

    fn table_prefix(&self) -> Vec<String> {
        self.prefix.clone()
    }

    async fn execute(&self, sql: &str) -> Result<Option<u64>> {
        self.store
            .lock()
            .statements
            .push((self.warehouse, sql.to_string()));
        Ok(None)
    }

    async fn replace_table(&self, table: &TableHandle, statements: &[String]) -> Result<()> {
        let mut state = self.store.lock();
        if let Some(ref message) = state.create_error {
            return Err(Error::warehouse(self.warehouse, message.clone()));
        }
        for statement in statements {
            state.statements.push((self.warehouse, statement.clone()));
        }
        state.tables.insert((self.warehouse, table.name.clone()), 0);
        Ok(())
    }

    async fn probe_table(&self, table: &str) -> Result<()> {
        let mut state = self.store.lock();
        state.probes += 1;
        if state.probes <= state.hidden_probes {
            return Err(Error::TableNotFound {
                table: table.to_string(),
            });
        }
        Ok(())
    }

    async fn insert(&self, table: &TableHandle, payload: &InsertPayload) -> Result<InsertOutcome> {
        let mut state = self.store.lock();
        let call = state.insert_calls;
        state.insert_calls += 1;

        if state.failing_inserts.contains(&call) {
            return Err(Error::warehouse(
                self.warehouse,
                format!("insert {call} rejected"),
            ));
        }

        if let InsertBody::Sql(ref sql) = payload.body {
            state.statements.push((self.warehouse, sql.clone()));
        }

        let rows = state
            .tables
            .get_mut(&(self.warehouse, table.name.clone()))
            .ok_or_else(|| Error::TableNotFound {
                table: table.name.clone(),
            })?;
        *rows += payload.rows;
        Ok(InsertOutcome::all(payload.rows))
    }
}
