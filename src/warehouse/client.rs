//! Warehouse client and connector traits
//!
//! A `WarehouseClient` is the opaque "execute SQL / insert rows" capability
//! the loader drives. A `Connector` turns a validated [`WarehouseTarget`]
//! into a client; the job only ever talks to that seam.

use super::bigquery::BigQueryClient;
use super::databricks::DatabricksClient;
use super::redshift::RedshiftClient;
use super::snowflake::SnowflakeClient;
use super::target::WarehouseTarget;
use super::types::{InsertOutcome, Namespace, TableHandle};
use crate::dialect::{Dialect, InsertBody, InsertPayload, Warehouse};
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use std::time::Duration;

/// Operations the loader needs from a warehouse
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    /// Which warehouse this client talks to
    fn warehouse(&self) -> Warehouse;

    /// Dataset or database tables land in
    fn namespace(&self) -> Namespace;

    /// Identifier parts preceding the table name (`project.dataset`, `db.schema`)
    fn table_prefix(&self) -> Vec<String>;

    /// SQL dialect for this warehouse
    fn dialect(&self) -> &'static dyn Dialect {
        self.warehouse().dialect()
    }

    /// Quoted, fully qualified table name
    fn qualified_table(&self, table: &str) -> String {
        let mut parts = self.table_prefix();
        parts.push(table.to_string());
        let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
        self.dialect().qualify(&parts)
    }

    /// Make sure the namespace exists
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }

    /// Run one statement to completion, returning affected rows when known
    async fn execute(&self, sql: &str) -> Result<Option<u64>>;

    /// Run the statements that drop and recreate a table
    async fn replace_table(&self, _table: &TableHandle, statements: &[String]) -> Result<()> {
        for statement in statements {
            self.execute(statement).await?;
        }
        Ok(())
    }

    /// Check that a table is visible to inserts
    ///
    /// Returns [`Error::TableNotFound`] while it is not.
    async fn probe_table(&self, _table: &str) -> Result<()> {
        Ok(())
    }

    /// Send one batch
    async fn insert(&self, _table: &TableHandle, payload: &InsertPayload) -> Result<InsertOutcome> {
        match &payload.body {
            InsertBody::Sql(sql) => {
                let affected = self.execute(sql).await?;
                Ok(outcome_from_affected(payload.rows, affected))
            }
            InsertBody::Rows(_) => Err(Error::warehouse(
                self.warehouse(),
                "row payloads need a streaming insert API",
            )),
        }
    }
}

/// Turn an affected-row count into an outcome for a batch of `rows`
pub fn outcome_from_affected(rows: usize, affected: Option<u64>) -> InsertOutcome {
    match affected {
        Some(n) => {
            let inserted = (n as usize).min(rows);
            InsertOutcome {
                inserted,
                failed: rows - inserted,
                errors: Vec::new(),
            }
        }
        None => InsertOutcome::all(rows),
    }
}

/// Builds clients for targets
pub trait Connector: Send + Sync {
    /// Connect to one warehouse
    fn connect(&self, target: &WarehouseTarget) -> Result<Box<dyn WarehouseClient>>;
}

/// Connects to the vendors' REST APIs
#[derive(Debug, Clone)]
pub struct HttpConnector {
    poll: RetryPolicy,
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self {
            poll: RetryPolicy::new(120)
                .with_delays(Duration::from_millis(250), Duration::from_secs(5)),
        }
    }
}

impl HttpConnector {
    /// Connector with the default statement polling policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Override how statement completion is polled
    #[must_use]
    pub fn with_poll_policy(mut self, poll: RetryPolicy) -> Self {
        self.poll = poll;
        self
    }
}

impl Connector for HttpConnector {
    fn connect(&self, target: &WarehouseTarget) -> Result<Box<dyn WarehouseClient>> {
        let poll = self.poll.clone();
        Ok(match target {
            WarehouseTarget::BigQuery(t) => Box::new(BigQueryClient::new(t.clone(), poll)?),
            WarehouseTarget::Snowflake(t) => Box::new(SnowflakeClient::new(t.clone(), poll)?),
            WarehouseTarget::Redshift(t) => Box::new(RedshiftClient::new(t.clone(), poll)?),
            WarehouseTarget::Databricks(t) => Box::new(DatabricksClient::new(t.clone(), poll)?),
        })
    }
}
