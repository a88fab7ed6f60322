//! Load result types

use crate::dialect::{VendorSchema, Warehouse};
use serde::{Deserialize, Serialize};

/// Where a table lives, as reported in results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Namespace {
    /// BigQuery dataset
    Dataset(String),
    /// Database (Snowflake, Redshift, Databricks)
    Database(String),
}

impl Namespace {
    /// The bare name
    pub fn name(&self) -> &str {
        match self {
            Namespace::Dataset(name) | Namespace::Database(name) => name,
        }
    }
}

/// A table that was created successfully and may receive inserts
#[derive(Debug, Clone, PartialEq)]
pub struct TableHandle {
    /// Sanitized table name
    pub name: String,
    /// Quoted, fully qualified name for SQL
    pub qualified: String,
    /// Vendor-mapped schema the table was created with
    pub schema: VendorSchema,
}

/// What a warehouse reports back for one insert call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Rows accepted
    pub inserted: usize,
    /// Rows rejected
    pub failed: usize,
    /// Per-row error messages
    pub errors: Vec<String>,
}

impl InsertOutcome {
    /// Every row of the batch was accepted
    pub fn all(rows: usize) -> Self {
        Self {
            inserted: rows,
            ..Self::default()
        }
    }
}

/// Batch status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertStatus {
    /// Every row landed
    Success,
    /// The call failed or some rows were rejected
    Error,
}

/// Result of one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    /// Batch status
    pub status: InsertStatus,
    /// Rows accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_rows: Option<usize>,
    /// Rows rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_rows: Option<usize>,
    /// Wall time in milliseconds
    pub duration: u64,
    /// Row-level errors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Call-level error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl InsertResult {
    /// Result from a completed insert call
    pub fn from_outcome(outcome: InsertOutcome, duration: u64) -> Self {
        let status = if outcome.failed == 0 {
            InsertStatus::Success
        } else {
            InsertStatus::Error
        };
        Self {
            status,
            inserted_rows: Some(outcome.inserted),
            failed_rows: Some(outcome.failed),
            duration,
            errors: outcome.errors,
            error_message: None,
        }
    }

    /// Result from an insert call that failed outright
    pub fn failed(rows: usize, message: impl Into<String>, duration: u64) -> Self {
        Self {
            status: InsertStatus::Error,
            inserted_rows: None,
            failed_rows: Some(rows),
            duration,
            errors: Vec::new(),
            error_message: Some(message.into()),
        }
    }

    /// Whether the batch fully succeeded
    pub fn is_success(&self) -> bool {
        self.status == InsertStatus::Success
    }
}

/// Per-table totals across batches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertSummary {
    /// Rows inserted
    pub success: usize,
    /// Rows failed
    pub failed: usize,
    /// Sum of batch durations in milliseconds
    pub duration: u64,
    /// Every error message, in batch order
    pub errors: Vec<String>,
}

impl InsertSummary {
    /// Sum a list of batch results
    pub fn from_results(results: &[InsertResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, result| {
            acc.success += result.inserted_rows.unwrap_or(0);
            acc.failed += result.failed_rows.unwrap_or(0);
            acc.duration += result.duration;
            acc.errors.extend(result.errors.iter().cloned());
            if let Some(ref message) = result.error_message {
                acc.errors.push(message.clone());
            }
            acc
        })
    }
}

/// Outcome of loading one table into one warehouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseUploadResult {
    /// Target warehouse
    pub warehouse: Warehouse,
    /// BigQuery dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    /// Database for the other vendors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Sanitized table name
    pub table: String,
    /// Vendor-mapped schema
    pub schema: VendorSchema,
    /// One entry per batch, empty on a dry run
    pub upload: Vec<InsertResult>,
    /// Totals over `upload`
    pub insert: InsertSummary,
}

impl WarehouseUploadResult {
    /// Assemble a result and its summary
    pub fn new(
        warehouse: Warehouse,
        namespace: &Namespace,
        table: &TableHandle,
        upload: Vec<InsertResult>,
    ) -> Self {
        let (dataset, database) = match namespace {
            Namespace::Dataset(name) => (Some(name.clone()), None),
            Namespace::Database(name) => (None, Some(name.clone())),
        };
        let insert = InsertSummary::from_results(&upload);
        Self {
            warehouse,
            dataset,
            database,
            table: table.name.clone(),
            schema: table.schema.clone(),
            upload,
            insert,
        }
    }
}
