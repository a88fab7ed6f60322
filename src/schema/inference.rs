//! Semantic type inference for single values
//!
//! Precedence is significant because the categories overlap: `"true"` is a
//! boolean token, `"[1]"` is JSON text, `"12"` is a number and could also be
//! read as a year. The first matching rule wins:
//!
//! 1. native array / object
//! 2. native boolean, or a case-insensitive `true` / `false` token
//! 3. JSON text that parses to an array or object
//! 4. finite number (`FLOAT` if it has a decimal point)
//! 5. calendar-valid ISO-8601 date or date-time
//! 6. `STRING`

use super::types::SemanticType;
use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// `YYYY-MM[-DD][(T| )HH:MM[:SS[.fff]]][Z|±HH[:]MM]`
static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4})-(\d{2})(?:-(\d{2}))?(?:[T ](\d{2}):(\d{2})(?::(\d{2})(?:[.,]\d+)?)?)?(Z|[+-]\d{2}(?::?\d{2})?)?$",
    )
    .expect("ISO date pattern is valid")
});

/// Classify a single value
pub fn infer_type(value: &Value) -> SemanticType {
    match value {
        Value::Array(_) => SemanticType::Array,
        Value::Object(_) => SemanticType::Object,
        Value::Bool(_) => SemanticType::Boolean,
        Value::Number(n) => {
            if n.is_f64() {
                SemanticType::Float
            } else {
                SemanticType::Int
            }
        }
        Value::Null => SemanticType::String,
        Value::String(s) => infer_str(s),
    }
}

/// Classify a raw string (a CSV cell)
pub fn infer_str(s: &str) -> SemanticType {
    if is_boolean_token(s) {
        return SemanticType::Boolean;
    }

    if is_json_text(s) {
        return if s.starts_with('[') && s.ends_with(']') {
            SemanticType::Array
        } else if s.starts_with('{') && s.ends_with('}') {
            SemanticType::Object
        } else {
            SemanticType::Json
        };
    }

    if is_finite_number(s) {
        return if s.contains('.') {
            SemanticType::Float
        } else {
            SemanticType::Int
        };
    }

    if is_iso_date(s) {
        // byte 10 follows YYYY-MM-DD and is the date/time separator
        let has_time = matches!(s.as_bytes().get(10), Some(b'T' | b' '));
        return if has_time || s.ends_with('Z') {
            SemanticType::Timestamp
        } else {
            SemanticType::Date
        };
    }

    SemanticType::String
}

/// Whole trimmed token is `true` or `false`, any case
pub fn is_boolean_token(s: &str) -> bool {
    let s = s.trim();
    s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")
}

/// Parses as a JSON array or object
pub fn is_json_text(s: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(s),
        Ok(Value::Array(_) | Value::Object(_))
    )
}

/// Parses as a finite decimal number, surrounding whitespace allowed
pub fn is_finite_number(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    // f64::from_str also accepts "inf" and "NaN" spellings
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'))
    {
        return false;
    }
    s.parse::<f64>().is_ok_and(f64::is_finite)
}

/// ISO-8601 date or date-time whose calendar and clock parts are in range
pub fn is_iso_date(s: &str) -> bool {
    let Some(caps) = ISO_DATE.captures(s) else {
        return false;
    };

    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let Some(year) = caps.get(1).and_then(|m| m.as_str().parse::<i32>().ok()) else {
        return false;
    };
    let (Some(month), day) = (part(2), part(3).unwrap_or(1)) else {
        return false;
    };
    if NaiveDate::from_ymd_opt(year, month, day).is_none() {
        return false;
    }

    match (part(4), part(5)) {
        (Some(hour), Some(minute)) => {
            NaiveTime::from_hms_opt(hour, minute, part(6).unwrap_or(0)).is_some()
        }
        _ => true,
    }
}
