//! The `Dialect` trait
//!
//! A dialect owns everything vendor-specific about turning a schema and a
//! batch into text: type names, identifier quoting, string escaping, DDL,
//! literal formatting, and the shape of an insert.

use super::format::{as_bool, is_null_like, json_cell, json_text, numeral};
use super::types::{InsertBody, InsertPayload, VendorField, VendorSchema, Warehouse};
use crate::schema::{FieldMode, SchemaField, SemanticType};
use crate::types::{value_text, JsonObject, Record};
use serde_json::Value;

/// Vendor SQL conventions
pub trait Dialect: Send + Sync {
    /// Which warehouse this dialect speaks for
    fn warehouse(&self) -> Warehouse;

    /// Native type name for a semantic type
    fn vendor_type(&self, field_type: SemanticType) -> &'static str;

    /// Identifier quote character
    fn quote_char(&self) -> char;

    /// Escape the body of a single-quoted string literal
    fn escape_string(&self, s: &str) -> String;

    /// Whether a new table must be polled for visibility before inserting
    fn polls_for_table(&self) -> bool {
        false
    }

    /// Quote one identifier, doubling any embedded quote character
    fn quote_ident(&self, ident: &str) -> String {
        let q = self.quote_char();
        let doubled: String = [q, q].iter().collect();
        format!("{q}{}{q}", ident.replace(q, &doubled))
    }

    /// Quote and dot-join a multi-part name (`dataset.table`)
    fn qualify(&self, parts: &[&str]) -> String {
        parts
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| self.quote_ident(p))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Type used in DDL for one column
    fn column_type(&self, field: &SchemaField) -> String {
        self.vendor_type(field.field_type).to_string()
    }

    /// Vendor-mapped copy of the schema
    fn vendor_schema(&self, schema: &[SchemaField]) -> VendorSchema {
        schema
            .iter()
            .map(|field| VendorField {
                name: field.name.clone(),
                field_type: self.vendor_type(field.field_type).to_string(),
                mode: field.mode,
            })
            .collect()
    }

    /// `"a" VARCHAR, "b" NUMBER NOT NULL`
    fn column_definitions(&self, schema: &[SchemaField]) -> String {
        schema
            .iter()
            .map(|field| {
                let not_null = if field.mode == FieldMode::Required {
                    " NOT NULL"
                } else {
                    ""
                };
                format!(
                    "{} {}{not_null}",
                    self.quote_ident(&field.name),
                    self.column_type(field)
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Statements that (re)create the table, discarding any previous data
    fn create_table_statements(&self, table: &str, schema: &[SchemaField]) -> Vec<String> {
        vec![format!(
            "CREATE OR REPLACE TABLE {table} ({})",
            self.column_definitions(schema)
        )]
    }

    /// Single-quoted string literal
    fn string_literal(&self, s: &str) -> String {
        format!("'{}'", self.escape_string(s))
    }

    /// Literal for a DATE or TIMESTAMP column
    fn temporal_literal(&self, text: &str, _field_type: SemanticType) -> String {
        self.string_literal(text)
    }

    /// Literal for an ARRAY, OBJECT or JSON column
    fn semi_structured_literal(&self, json: &str) -> String {
        self.string_literal(json)
    }

    /// SQL literal for one cell
    ///
    /// Values that do not fit the column type fall back to a quoted string.
    fn format_value(&self, value: &Value, field_type: SemanticType) -> String {
        if is_null_like(value) {
            return "NULL".to_string();
        }

        match field_type {
            SemanticType::Boolean => match as_bool(value) {
                Some(true) => "TRUE".to_string(),
                Some(false) => "FALSE".to_string(),
                None => self.string_literal(&value_text(value)),
            },
            SemanticType::Int | SemanticType::Float => numeral(value, field_type)
                .unwrap_or_else(|| self.string_literal(&value_text(value))),
            SemanticType::Date | SemanticType::Timestamp => {
                self.temporal_literal(value_text(value).trim(), field_type)
            }
            SemanticType::Array | SemanticType::Object | SemanticType::Json => {
                self.semi_structured_literal(&json_text(value))
            }
            SemanticType::String => self.string_literal(&value_text(value)),
        }
    }

    /// `(v1, v2, ...)` for one record, in schema order
    fn row_literals(&self, schema: &[SchemaField], record: &Record) -> Vec<String> {
        schema
            .iter()
            .map(|field| {
                let value = record.get(&field.name).unwrap_or(&Value::Null);
                self.format_value(value, field.field_type)
            })
            .collect()
    }

    /// Quoted, comma-separated column list
    fn column_list(&self, schema: &[SchemaField]) -> String {
        schema
            .iter()
            .map(|f| self.quote_ident(&f.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// One multi-row `INSERT ... VALUES` statement for the batch
    fn insert_payload(&self, table: &str, schema: &[SchemaField], batch: &[Record]) -> InsertPayload {
        let rows = batch
            .iter()
            .map(|record| format!("({})", self.row_literals(schema, record).join(", ")))
            .collect::<Vec<_>>()
            .join(", ");

        InsertPayload {
            rows: batch.len(),
            body: InsertBody::Sql(format!(
                "INSERT INTO {table} ({}) VALUES {rows}",
                self.column_list(schema)
            )),
        }
    }
}

/// Typed JSON rows keyed by column name, for streaming insert APIs
pub fn json_rows(schema: &[SchemaField], batch: &[Record]) -> Vec<JsonObject> {
    batch
        .iter()
        .map(|record| {
            schema
                .iter()
                .map(|field| {
                    let value = record.get(&field.name).unwrap_or(&Value::Null);
                    (field.name.clone(), json_cell(value, field.field_type))
                })
                .collect()
        })
        .collect()
}
