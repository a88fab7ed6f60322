//! Dialect types

use crate::error::{Error, Result};
use crate::schema::FieldMode;
use crate::types::JsonObject;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported target warehouses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Warehouse {
    BigQuery,
    Snowflake,
    Redshift,
    Databricks,
}

impl Warehouse {
    /// Every supported warehouse
    pub const ALL: [Warehouse; 4] = [
        Warehouse::BigQuery,
        Warehouse::Snowflake,
        Warehouse::Redshift,
        Warehouse::Databricks,
    ];

    /// Lower-case identifier used in config and output
    pub fn as_str(self) -> &'static str {
        match self {
            Warehouse::BigQuery => "bigquery",
            Warehouse::Snowflake => "snowflake",
            Warehouse::Redshift => "redshift",
            Warehouse::Databricks => "databricks",
        }
    }
}

impl std::fmt::Display for Warehouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Warehouse {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bigquery" => Ok(Warehouse::BigQuery),
            "snowflake" => Ok(Warehouse::Snowflake),
            "redshift" => Ok(Warehouse::Redshift),
            "databricks" => Ok(Warehouse::Databricks),
            _ => Err(Error::UnknownWarehouse {
                name: s.to_string(),
            }),
        }
    }
}

/// A column in the vendor's type vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorField {
    /// Sanitized column name
    pub name: String,

    /// Vendor type name
    #[serde(rename = "type")]
    pub field_type: String,

    /// Column mode
    pub mode: FieldMode,
}

/// Vendor-mapped schema, derived from (never replacing) the generic one
pub type VendorSchema = Vec<VendorField>;

/// What a client sends for one batch
#[derive(Debug, Clone, PartialEq)]
pub enum InsertBody {
    /// A single SQL statement carrying every row as literals
    Sql(String),
    /// Typed JSON rows for a streaming insert API
    Rows(Vec<JsonObject>),
}

/// One batch, formatted for a vendor
#[derive(Debug, Clone, PartialEq)]
pub struct InsertPayload {
    /// Number of rows in the batch
    pub rows: usize,
    /// Statement or rows
    pub body: InsertBody,
}

impl InsertPayload {
    /// The SQL statement, if this payload is one
    pub fn sql(&self) -> Option<&str> {
        match &self.body {
            InsertBody::Sql(sql) => Some(sql),
            InsertBody::Rows(_) => None,
        }
    }
}
