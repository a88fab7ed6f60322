//! Value coercion shared by every dialect
//!
//! These helpers decide what a raw cell means for a column type. Quoting
//! and escaping stay in the dialects.

use crate::schema::{is_boolean_token, SemanticType};
use crate::types::value_text;
use serde_json::Value;

/// Null, empty, whitespace-only, or the literal string `null`
pub fn is_null_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => {
            let s = s.trim();
            s.is_empty() || s.eq_ignore_ascii_case("null")
        }
        _ => false,
    }
}

/// Boolean reading of a native bool or a `true`/`false` token
pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if is_boolean_token(s) => Some(s.trim().eq_ignore_ascii_case("true")),
        _ => None,
    }
}

/// Integer reading of a native integer or an integral numeric string
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => {
            let s = s.trim();
            s.strip_prefix('+').unwrap_or(s).parse::<i64>().ok()
        }
        _ => None,
    }
}

/// Finite float reading of a native number or a numeric string
pub fn as_float(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if crate::schema::is_finite_number(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Canonical numeral for an INT or FLOAT column, if the value fits the type
pub fn numeral(value: &Value, field_type: SemanticType) -> Option<String> {
    match field_type {
        SemanticType::Int => as_int(value).map(|n| n.to_string()),
        SemanticType::Float => as_int(value)
            .map(|n| n.to_string())
            .or_else(|| as_float(value).map(|f| f.to_string())),
        _ => None,
    }
}

/// JSON text for a semi-structured column
///
/// Strings that already hold JSON pass through; any other string is encoded
/// as a JSON string so the vendor's JSON parser accepts it.
pub fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(_) => s.trim().to_string(),
            Err(_) => Value::String(s.clone()).to_string(),
        },
        other => other.to_string(),
    }
}

/// Typed JSON cell for streaming insert APIs
pub fn json_cell(value: &Value, field_type: SemanticType) -> Value {
    if is_null_like(value) {
        return Value::Null;
    }

    match field_type {
        SemanticType::Boolean => as_bool(value).map_or_else(|| text(value), Value::Bool),
        SemanticType::Int => as_int(value).map_or_else(|| text(value), Value::from),
        SemanticType::Float => as_float(value)
            .and_then(serde_json::Number::from_f64)
            .map_or_else(|| text(value), Value::Number),
        SemanticType::Array | SemanticType::Object | SemanticType::Json => {
            Value::String(json_text(value))
        }
        SemanticType::String | SemanticType::Date | SemanticType::Timestamp => text(value),
    }
}

fn text(value: &Value) -> Value {
    Value::String(value_text(value))
}

/// Escape for SQL dialects that double quotes (`it''s`) and treat `\` as an escape
pub fn escape_doubling(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "''")
}

/// Escape for SQL dialects with C-style string escapes (`it\'s`)
pub fn escape_backslash(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
