//! Dialect implementations, one per warehouse

use super::format::{escape_backslash, escape_doubling};
use super::sql::{json_rows, Dialect};
use super::types::{InsertBody, InsertPayload, Warehouse};
use crate::schema::{FieldMode, SchemaField, SemanticType};
use crate::types::Record;

// ============================================================================
// BigQuery
// ============================================================================

/// GoogleSQL; rows go through the streaming insert API
#[derive(Debug, Clone, Copy, Default)]
pub struct BigQueryDialect;

impl Dialect for BigQueryDialect {
    fn warehouse(&self) -> Warehouse {
        Warehouse::BigQuery
    }

    fn vendor_type(&self, field_type: SemanticType) -> &'static str {
        match field_type {
            SemanticType::String => "STRING",
            SemanticType::Int => "INT64",
            SemanticType::Float => "FLOAT64",
            SemanticType::Boolean => "BOOLEAN",
            SemanticType::Date => "DATE",
            SemanticType::Timestamp => "TIMESTAMP",
            SemanticType::Array | SemanticType::Object | SemanticType::Json => "STRING",
        }
    }

    fn quote_char(&self) -> char {
        '`'
    }

    fn escape_string(&self, s: &str) -> String {
        escape_backslash(s)
    }

    fn polls_for_table(&self) -> bool {
        true
    }

    fn column_type(&self, field: &SchemaField) -> String {
        let base = self.vendor_type(field.field_type);
        if field.mode == FieldMode::Repeated {
            format!("ARRAY<{base}>")
        } else {
            base.to_string()
        }
    }

    fn temporal_literal(&self, text: &str, field_type: SemanticType) -> String {
        let keyword = if field_type == SemanticType::Date {
            "DATE"
        } else {
            "TIMESTAMP"
        };
        format!("{keyword} {}", self.string_literal(text))
    }

    fn insert_payload(&self, _table: &str, schema: &[SchemaField], batch: &[Record]) -> InsertPayload {
        InsertPayload {
            rows: batch.len(),
            body: InsertBody::Rows(json_rows(schema, batch)),
        }
    }
}

// ============================================================================
// Snowflake
// ============================================================================

/// Snowflake SQL; semi-structured values land in VARIANT via PARSE_JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct SnowflakeDialect;

impl Dialect for SnowflakeDialect {
    fn warehouse(&self) -> Warehouse {
        Warehouse::Snowflake
    }

    fn vendor_type(&self, field_type: SemanticType) -> &'static str {
        match field_type {
            SemanticType::String => "VARCHAR",
            SemanticType::Int => "NUMBER",
            SemanticType::Float => "FLOAT",
            SemanticType::Boolean => "BOOLEAN",
            SemanticType::Date => "DATE",
            SemanticType::Timestamp => "TIMESTAMP",
            SemanticType::Array | SemanticType::Object | SemanticType::Json => "VARIANT",
        }
    }

    fn quote_char(&self) -> char {
        '"'
    }

    fn escape_string(&self, s: &str) -> String {
        escape_doubling(s)
    }

    fn semi_structured_literal(&self, json: &str) -> String {
        format!("PARSE_JSON({})", self.string_literal(json))
    }

    // PARSE_JSON is not allowed in a VALUES clause, so rows are SELECTs
    fn insert_payload(&self, table: &str, schema: &[SchemaField], batch: &[Record]) -> InsertPayload {
        let selects = batch
            .iter()
            .map(|record| format!("SELECT {}", self.row_literals(schema, record).join(", ")))
            .collect::<Vec<_>>()
            .join(" UNION ALL ");

        InsertPayload {
            rows: batch.len(),
            body: InsertBody::Sql(format!(
                "INSERT INTO {table} ({}) {selects}",
                self.column_list(schema)
            )),
        }
    }
}

// ============================================================================
// Redshift
// ============================================================================

/// Redshift SQL; no CREATE OR REPLACE, semi-structured values go to SUPER
#[derive(Debug, Clone, Copy, Default)]
pub struct RedshiftDialect;

impl Dialect for RedshiftDialect {
    fn warehouse(&self) -> Warehouse {
        Warehouse::Redshift
    }

    fn vendor_type(&self, field_type: SemanticType) -> &'static str {
        match field_type {
            SemanticType::String => "VARCHAR",
            SemanticType::Int => "INTEGER",
            SemanticType::Float => "REAL",
            SemanticType::Boolean => "BOOLEAN",
            SemanticType::Date => "DATE",
            SemanticType::Timestamp => "TIMESTAMP",
            SemanticType::Array | SemanticType::Object | SemanticType::Json => "SUPER",
        }
    }

    fn quote_char(&self) -> char {
        '"'
    }

    fn escape_string(&self, s: &str) -> String {
        escape_doubling(s)
    }

    // bare VARCHAR is VARCHAR(256)
    fn column_type(&self, field: &SchemaField) -> String {
        match field.field_type {
            SemanticType::String => "VARCHAR(MAX)".to_string(),
            other => self.vendor_type(other).to_string(),
        }
    }

    fn create_table_statements(&self, table: &str, schema: &[SchemaField]) -> Vec<String> {
        vec![
            format!("DROP TABLE IF EXISTS {table}"),
            format!("CREATE TABLE {table} ({})", self.column_definitions(schema)),
        ]
    }

    fn semi_structured_literal(&self, json: &str) -> String {
        format!("JSON_PARSE({})", self.string_literal(json))
    }
}

// ============================================================================
// Databricks
// ============================================================================

/// Spark SQL on Delta tables
#[derive(Debug, Clone, Copy, Default)]
pub struct DatabricksDialect;

impl Dialect for DatabricksDialect {
    fn warehouse(&self) -> Warehouse {
        Warehouse::Databricks
    }

    fn vendor_type(&self, field_type: SemanticType) -> &'static str {
        match field_type {
            SemanticType::String => "STRING",
            SemanticType::Int => "INT",
            SemanticType::Float => "FLOAT",
            SemanticType::Boolean => "BOOLEAN",
            SemanticType::Date => "DATE",
            SemanticType::Timestamp => "TIMESTAMP",
            SemanticType::Array | SemanticType::Object | SemanticType::Json => "STRING",
        }
    }

    fn quote_char(&self) -> char {
        '`'
    }

    // adjacent literals concatenate in Spark SQL, so quotes cannot be doubled
    fn escape_string(&self, s: &str) -> String {
        escape_backslash(s)
    }

    fn column_type(&self, field: &SchemaField) -> String {
        let base = self.vendor_type(field.field_type);
        if field.mode == FieldMode::Repeated {
            format!("ARRAY<{base}>")
        } else {
            base.to_string()
        }
    }

    fn create_table_statements(&self, table: &str, schema: &[SchemaField]) -> Vec<String> {
        vec![format!(
            "CREATE OR REPLACE TABLE {table} ({}) USING DELTA",
            self.column_definitions(schema)
        )]
    }
}

impl Warehouse {
    /// The dialect for this warehouse
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            Warehouse::BigQuery => &BigQueryDialect,
            Warehouse::Snowflake => &SnowflakeDialect,
            Warehouse::Redshift => &RedshiftDialect,
            Warehouse::Databricks => &DatabricksDialect,
        }
    }
}
