//! Tests for decoder module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use test_case::test_case;

// ============================================================================
// Format detection
// ============================================================================

#[test_case("data.csv", InputFormat::Csv ; "csv")]
#[test_case("DATA.CSV", InputFormat::Csv ; "upper case csv")]
#[test_case("events.jsonl", InputFormat::Jsonl ; "jsonl")]
#[test_case("events.ndjson", InputFormat::Jsonl ; "ndjson")]
#[test_case("rows.json", InputFormat::Json ; "json")]
fn test_format_from_path(path: &str, expected: InputFormat) {
    assert_eq!(InputFormat::from_path(Path::new(path)).unwrap(), expected);
}

#[test]
fn test_unknown_extension() {
    assert!(InputFormat::from_path(Path::new("data.parquet")).is_err());
    assert!(InputFormat::from_path(Path::new("data")).is_err());
}

#[test]
fn test_input_file_stem() {
    let input = InputFile::Csv("/tmp/exports/Monthly Sales.csv".into());
    assert_eq!(input.stem(), Some("Monthly Sales"));
}

// ============================================================================
// CSV Decoder Tests
// ============================================================================

#[test]
fn test_csv_keeps_cells_as_strings() {
    let body = "name,age,active\nAlice,30,true\nBob,,false\n";
    let records = CsvDecoder::new().decode(body).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(
        serde_json::Value::Object(records[0].clone()),
        json!({ "name": "Alice", "age": "30", "active": "true" })
    );
    assert_eq!(records[1]["age"], json!(""));
}

#[test]
fn test_csv_preserves_header_order() {
    let body = "zeta,alpha,mid\n1,2,3\n";
    let records = CsvDecoder::new().decode(body).unwrap();
    let keys: Vec<_> = records[0].keys().cloned().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_csv_quoted_fields() {
    let body = "id,note\n1,\"hello, world\"\n2,\"she said \"\"hi\"\"\"\n3,\"line\nbreak\"\n";
    let records = CsvDecoder::new().decode(body).unwrap();

    assert_eq!(records[0]["note"], json!("hello, world"));
    assert_eq!(records[1]["note"], json!("she said \"hi\""));
    assert_eq!(records[2]["note"], json!("line\nbreak"));
}

#[test]
fn test_csv_short_rows_and_bom() {
    let body = "\u{feff}a,b,c\n1,2\n";
    let records = CsvDecoder::new().decode(body).unwrap();

    let keys: Vec<_> = records[0].keys().cloned().collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
    assert_eq!(records[0]["c"], json!(""));
}

#[test]
fn test_csv_custom_delimiter() {
    let records = CsvDecoder::with_delimiter(b';').decode("a;b\n1;2\n").unwrap();
    assert_eq!(records[0]["b"], json!("2"));
}

#[test]
fn test_csv_header_only() {
    assert!(CsvDecoder::new().decode("a,b\n").unwrap().is_empty());
}

// ============================================================================
// JSON / JSONL Decoder Tests
// ============================================================================

#[test]
fn test_jsonl_keeps_native_types() {
    let body = "{\"id\": 1, \"tags\": [\"a\"], \"ok\": true}\n\n{\"id\": 2, \"meta\": {\"x\": 1}}\n";
    let records = JsonlDecoder::new().decode(body).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["tags"], json!(["a"]));
    assert_eq!(records[0]["ok"], json!(true));
    assert_eq!(records[1]["meta"], json!({ "x": 1 }));
}

#[test]
fn test_jsonl_reports_bad_line() {
    let err = JsonlDecoder::new()
        .decode("{\"a\": 1}\nnot json\n")
        .unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_jsonl_rejects_non_objects() {
    let err = JsonlDecoder::new().decode("{\"a\": 1}\n[1, 2]\n").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_json_array() {
    let records = JsonDecoder::new()
        .decode("[{\"a\": 1}, {\"a\": 2, \"b\": null}]")
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["b"], json!(null));
}

#[test]
fn test_json_falls_back_to_lines() {
    let records = JsonDecoder::new().decode("{\"a\": 1}\n{\"a\": 2}\n").unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_json_array_with_scalar() {
    let err = JsonDecoder::new().decode("[{\"a\": 1}, 5]").unwrap_err();
    assert!(err.to_string().contains("element 1"));
}

// ============================================================================
// File reading
// ============================================================================

#[tokio::test]
async fn test_read_records_from_files() {
    let mut csv_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(csv_file, "a,b\n1,2\n3,4\n").unwrap();
    let records = read_records(&InputFile::Csv(csv_file.path().to_path_buf()))
        .await
        .unwrap();
    assert_eq!(records.len(), 2);

    let mut json_file = tempfile::Builder::new().suffix(".jsonl").tempfile().unwrap();
    writeln!(json_file, "{{\"a\": 1}}").unwrap();
    let records = read_records(&InputFile::Json(json_file.path().to_path_buf()))
        .await
        .unwrap();
    assert_eq!(records[0]["a"], json!(1));
}

#[tokio::test]
async fn test_read_records_missing_file() {
    let err = read_records(&InputFile::Csv("/definitely/not/here.csv".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}
