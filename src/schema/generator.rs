//! Schema generation over a record set

use super::inference::infer_type;
use super::types::{Schema, SchemaField, SemanticType};
use crate::types::Record;
use serde_json::Value;
use std::collections::HashSet;

/// All distinct keys across the records, in first-seen order
pub fn unique_keys(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    for record in records {
        for key in record.keys() {
            if seen.insert(key.as_str()) {
                keys.push(key.clone());
            }
        }
    }

    keys
}

/// Build one field per key, typed from the first populated value
///
/// The first record carrying a non-empty value for a column decides its
/// type; later rows are not consulted. A column with no populated value in
/// any record is `STRING`. The caller's records are only borrowed.
pub fn generate_schema(records: &[Record]) -> Schema {
    unique_keys(records)
        .into_iter()
        .map(|key| {
            let field_type = records
                .iter()
                .filter_map(|record| record.get(&key))
                .find(|value| is_populated(value))
                .map_or(SemanticType::String, infer_type);
            SchemaField::new(key, field_type)
        })
        .collect()
}

/// Falsy values are skipped: null, `false`, numeric zero, blank strings
fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}
