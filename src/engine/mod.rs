//! Job orchestration
//!
//! A [`Job`] reads the input, infers one schema, plans batches, then loads
//! every requested warehouse in turn. Warehouses never run concurrently and
//! each one finishes (table plus every batch) before the next starts.
//!
//! Configuration is validated before any file or network I/O. Batch failures
//! are reported in the result; anything else aborts the job.

mod types;

pub use types::{clock_time, records_per_sec, JobResult};

use crate::batch::batch_data;
use crate::config::JobConfig;
use crate::decode::read_records;
use crate::error::Result;
use crate::retry::RetryPolicy;
use crate::schema::generate_schema;
use crate::types::Record;
use crate::warehouse::{Connector, HttpConnector, WarehouseLoader, WarehouseTarget};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// One load job
pub struct Job {
    config: JobConfig,
    connector: Arc<dyn Connector>,
    readiness: Option<RetryPolicy>,
}

impl Job {
    /// Job that talks to the real warehouses
    pub fn new(config: JobConfig) -> Self {
        Self {
            config,
            connector: Arc::new(HttpConnector::new()),
            readiness: None,
        }
    }

    /// Use another connector, e.g. [`crate::warehouse::MemoryWarehouse`]
    #[must_use]
    pub fn with_connector(mut self, connector: impl Connector + 'static) -> Self {
        self.connector = Arc::new(connector);
        self
    }

    /// Override how long loaders wait for new tables
    #[must_use]
    pub fn with_readiness(mut self, policy: RetryPolicy) -> Self {
        self.readiness = Some(policy);
        self
    }

    /// The job's configuration
    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Read the configured input file and load it
    pub async fn run(&self) -> Result<JobResult> {
        let start = Instant::now();
        let targets = self.config.validate()?;
        let input = self.config.input()?;
        let table = self.config.table_name()?;

        let records = read_records(&input).await?;
        info!("read {} records from {}", records.len(), input.path().display());

        self.load(&targets, &table, &records, start).await
    }

    /// Load records that are already in memory
    ///
    /// The input file options are only used to derive a table name.
    pub async fn load_records(&self, records: &[Record]) -> Result<JobResult> {
        let start = Instant::now();
        let targets = self
            .config
            .warehouses()?
            .into_iter()
            .map(|w| self.config.target(w))
            .collect::<Result<Vec<_>>>()?;
        let table = self.config.table_name()?;

        self.load(&targets, &table, records, start).await
    }

    async fn load(
        &self,
        targets: &[WarehouseTarget],
        table: &str,
        records: &[Record],
        start: Instant,
    ) -> Result<JobResult> {
        let schema = generate_schema(records);
        let batches = batch_data(records, self.config.batch_size());
        info!(
            "inferred {} columns, {} batches of up to {} rows",
            schema.len(),
            batches.len(),
            self.config.batch_size()
        );

        let mut results = Vec::with_capacity(targets.len());
        for target in targets {
            let client = self.connector.connect(target)?;
            let mut loader = WarehouseLoader::new(client.as_ref());
            if let Some(ref policy) = self.readiness {
                loader = loader.with_readiness(policy.clone());
            }
            results.push(
                loader
                    .load(table, &schema, &batches, self.config.dry_run)
                    .await?,
            );
        }

        let e2e_duration = start.elapsed().as_millis() as u64;
        let result = JobResult {
            version: crate::VERSION.to_string(),
            params: self.config.redacted(),
            results,
            e2e_duration,
            clock_time: clock_time(e2e_duration),
            records_per_sec: records_per_sec(records.len(), e2e_duration),
            total_rows: records.len(),
            intermediate_schema: schema,
        };

        info!(
            "job finished in {}: {} rows inserted, {} failed",
            result.clock_time,
            result.inserted_rows(),
            result.failed_rows()
        );
        Ok(result)
    }
}
