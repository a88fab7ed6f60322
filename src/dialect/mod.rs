//! Vendor dialects
//!
//! Maps the generic schema onto each warehouse's type system and renders
//! DDL, literals and insert payloads in that warehouse's SQL.
//!
//! | Semantic | BigQuery | Snowflake | Redshift | Databricks |
//! |---|---|---|---|---|
//! | STRING | STRING | VARCHAR | VARCHAR | STRING |
//! | INT | INT64 | NUMBER | INTEGER | INT |
//! | FLOAT | FLOAT64 | FLOAT | REAL | FLOAT |
//! | BOOLEAN | BOOLEAN | BOOLEAN | BOOLEAN | BOOLEAN |
//! | DATE | DATE | DATE | DATE | DATE |
//! | TIMESTAMP | TIMESTAMP | TIMESTAMP | TIMESTAMP | TIMESTAMP |
//! | JSON/OBJECT/ARRAY | STRING | VARIANT | SUPER | STRING |

mod format;
mod sql;
mod types;
mod vendors;

pub use format::{as_bool, as_float, as_int, is_null_like, json_cell, json_text};
pub use sql::{json_rows, Dialect};
pub use types::{InsertBody, InsertPayload, VendorField, VendorSchema, Warehouse};
pub use vendors::{BigQueryDialect, DatabricksDialect, RedshiftDialect, SnowflakeDialect};
