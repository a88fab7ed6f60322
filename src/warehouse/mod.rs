//! Warehouse module
//!
//! Everything that touches a warehouse: the client trait and its vendor
//! implementations, the in-memory client, connection targets, and the
//! loader that runs the create-then-insert sequence for one table.
//!
//! # Load sequence
//!
//! 1. Table and column names are sanitized; records are re-keyed to match
//! 2. The table is dropped and recreated (fatal on failure)
//! 3. BigQuery tables are polled until visible
//! 4. Batches are inserted one at a time; failures are recorded per batch

mod bigquery;
mod client;
mod databricks;
mod loader;
mod memory;
mod redshift;
mod snowflake;
mod target;
mod types;

pub use bigquery::{BigQueryClient, BIGQUERY_SCOPE};
pub use client::{outcome_from_affected, Connector, HttpConnector, WarehouseClient};
pub use databricks::DatabricksClient;
pub use loader::{sanitize, WarehouseLoader};
pub use memory::{MemoryClient, MemoryWarehouse};
pub use redshift::RedshiftClient;
pub use snowflake::SnowflakeClient;
pub use target::{
    BigQueryTarget, DatabricksTarget, RedshiftTarget, ServiceAccountKey, SnowflakeTarget,
    WarehouseTarget, BIGQUERY_API_URL, GOOGLE_TOKEN_URL,
};
pub use types::{
    InsertOutcome, InsertResult, InsertStatus, InsertSummary, Namespace, TableHandle,
    WarehouseUploadResult,
};
