//! The per-warehouse load sequence
//!
//! Sanitize names, (re)create the table, wait for it to become visible where
//! the vendor is eventually consistent, then send batches one at a time. A
//! failed batch is recorded and the loop moves on; a failed table creation
//! ends the load.

use super::client::WarehouseClient;
use super::types::{InsertResult, TableHandle, WarehouseUploadResult};
use crate::error::{Error, Result};
use crate::naming::{clean_name, prep_header_pairs};
use crate::retry::{retry, RetryPolicy};
use crate::schema::{Schema, SchemaField};
use crate::types::{Batch, Record};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Loads one table into one warehouse
pub struct WarehouseLoader<'a> {
    client: &'a dyn WarehouseClient,
    readiness: RetryPolicy,
}

impl<'a> WarehouseLoader<'a> {
    /// Loader with the default table-readiness policy
    pub fn new(client: &'a dyn WarehouseClient) -> Self {
        Self {
            client,
            readiness: RetryPolicy::new(10)
                .with_delays(Duration::from_millis(500), Duration::from_secs(8)),
        }
    }

    /// Override the table-readiness policy
    #[must_use]
    pub fn with_readiness(mut self, policy: RetryPolicy) -> Self {
        self.readiness = policy;
        self
    }

    /// Create the table and insert every batch
    ///
    /// On a dry run the table is still created but no batch is sent.
    pub async fn load(
        &self,
        table_name: &str,
        schema: &[SchemaField],
        batches: &[Batch],
        dry_run: bool,
    ) -> Result<WarehouseUploadResult> {
        let warehouse = self.client.warehouse();
        let table = clean_name(Some(table_name));
        let (schema, batches) = sanitize(schema, batches);

        self.client.prepare().await?;
        let handle = self.create_table(&table, &schema).await?;

        if dry_run {
            info!("{}: dry run, skipping inserts into {}", warehouse, handle.qualified);
            return Ok(WarehouseUploadResult::new(
                warehouse,
                &self.client.namespace(),
                &handle,
                Vec::new(),
            ));
        }

        if self.client.dialect().polls_for_table() {
            self.wait_for_table(&handle).await?;
        }

        let upload = self.insert_batches(&handle, &schema, &batches).await;
        let result = WarehouseUploadResult::new(warehouse, &self.client.namespace(), &handle, upload);

        info!(
            "{}: loaded {} rows into {} ({} failed) in {}ms",
            warehouse,
            result.insert.success,
            handle.qualified,
            result.insert.failed,
            result.insert.duration
        );
        Ok(result)
    }

    /// Drop and recreate the table
    pub async fn create_table(&self, table: &str, schema: &[SchemaField]) -> Result<TableHandle> {
        let dialect = self.client.dialect();
        let handle = TableHandle {
            name: table.to_string(),
            qualified: self.client.qualified_table(table),
            schema: dialect.vendor_schema(schema),
        };
        let statements = dialect.create_table_statements(&handle.qualified, schema);

        for statement in &statements {
            debug!("{}: {}", self.client.warehouse(), statement);
        }

        self.client
            .replace_table(&handle, &statements)
            .await
            .map_err(|e| Error::table_creation(&handle.qualified, e.to_string()))?;

        info!(
            "{}: created table {} with {} columns",
            self.client.warehouse(),
            handle.qualified,
            handle.schema.len()
        );
        Ok(handle)
    }

    /// Poll until a freshly created table accepts inserts
    async fn wait_for_table(&self, handle: &TableHandle) -> Result<()> {
        let result = retry(
            &self.readiness,
            |attempt| {
                debug!("probing {} (attempt {})", handle.qualified, attempt + 1);
                self.client.probe_table(&handle.name)
            },
            Error::is_table_not_found,
        )
        .await;

        match result {
            Err(Error::MaxRetriesExceeded { max_retries }) => Err(Error::TableNotReady {
                table: handle.qualified.clone(),
                attempts: max_retries,
            }),
            other => other,
        }
    }

    async fn insert_batches(
        &self,
        handle: &TableHandle,
        schema: &[SchemaField],
        batches: &[Batch],
    ) -> Vec<InsertResult> {
        let dialect = self.client.dialect();
        let mut results = Vec::with_capacity(batches.len());

        for (index, batch) in batches.iter().enumerate() {
            let start = Instant::now();

            if batch.is_empty() {
                results.push(InsertResult::from_outcome(Default::default(), 0));
                continue;
            }

            let payload = dialect.insert_payload(&handle.qualified, schema, batch);
            let result = match self.client.insert(handle, &payload).await {
                Ok(outcome) => {
                    let result = InsertResult::from_outcome(outcome, elapsed_ms(start));
                    if !result.is_success() {
                        warn!(
                            "{}: batch {} rejected {} of {} rows",
                            self.client.warehouse(),
                            index + 1,
                            result.failed_rows.unwrap_or(0),
                            batch.len()
                        );
                    }
                    result
                }
                Err(e) => {
                    warn!(
                        "{}: batch {} of {} failed: {}",
                        self.client.warehouse(),
                        index + 1,
                        batches.len(),
                        e
                    );
                    InsertResult::failed(batch.len(), e.to_string(), elapsed_ms(start))
                }
            };

            debug!(
                "{}: batch {}/{} done in {}ms",
                self.client.warehouse(),
                index + 1,
                batches.len(),
                result.duration
            );
            results.push(result);
        }

        results
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Rename schema fields and every record key to sanitized column names
pub fn sanitize(schema: &[SchemaField], batches: &[Batch]) -> (Schema, Vec<Batch>) {
    let pairs = prep_header_pairs(schema.iter().map(|f| Some(f.name.as_str())));
    let renames: HashMap<&str, &str> = pairs
        .iter()
        .map(|(original, clean)| (original.as_str(), clean.as_str()))
        .collect();

    let schema = schema
        .iter()
        .zip(&pairs)
        .map(|(field, (_, clean))| field.renamed(clean.clone()))
        .collect();

    let batches = batches
        .iter()
        .map(|batch| batch.iter().map(|r| rename_record(r, &renames)).collect())
        .collect();

    (schema, batches)
}

fn rename_record(record: &Record, renames: &HashMap<&str, &str>) -> Record {
    record
        .iter()
        .map(|(key, value)| {
            let key = renames.get(key.as_str()).map_or_else(|| key.clone(), |k| (*k).to_string());
            (key, value.clone())
        })
        .collect()
}
