//! Job result types

use crate::schema::Schema;
use crate::warehouse::WarehouseUploadResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything a finished job reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    /// Crate version that ran the job
    pub version: String,

    /// Options the job ran with, secrets masked
    #[serde(rename = "PARAMS")]
    pub params: Value,

    /// One entry per warehouse, in request order
    pub results: Vec<WarehouseUploadResult>,

    /// Wall time in milliseconds
    pub e2e_duration: u64,

    /// Wall time, human readable
    pub clock_time: String,

    /// Input rows per second of wall time
    pub records_per_sec: f64,

    /// Rows read from the input
    pub total_rows: usize,

    /// Generic schema before any vendor mapping
    pub intermediate_schema: Schema,
}

impl JobResult {
    /// Rows inserted across every warehouse
    pub fn inserted_rows(&self) -> usize {
        self.results.iter().map(|r| r.insert.success).sum()
    }

    /// Rows rejected across every warehouse
    pub fn failed_rows(&self) -> usize {
        self.results.iter().map(|r| r.insert.failed).sum()
    }
}

/// Rows per second, two decimals
pub fn records_per_sec(rows: usize, millis: u64) -> f64 {
    let secs = millis.max(1) as f64 / 1000.0;
    (rows as f64 / secs * 100.0).round() / 100.0
}

/// `850ms`, `12.34s`, `3m 5.20s`
pub fn clock_time(millis: u64) -> String {
    if millis < 1000 {
        return format!("{millis}ms");
    }
    let minutes = millis / 60_000;
    let secs = (millis % 60_000) as f64 / 1000.0;
    if minutes == 0 {
        format!("{secs:.2}s")
    } else {
        format!("{minutes}m {secs:.2}s")
    }
}
