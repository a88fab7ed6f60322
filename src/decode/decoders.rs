//! Decoder implementations
//!
//! Each decoder handles a specific file format.

use super::types::{InputFile, InputFormat, RecordDecoder};
use crate::error::{Error, Result};
use crate::types::Record;
use serde_json::{Map, Value};
use tracing::debug;

fn strip_bom(body: &str) -> &str {
    body.strip_prefix('\u{feff}').unwrap_or(body)
}

// ============================================================================
// JSON Decoder
// ============================================================================

/// A JSON array of objects; anything else is read as JSON Lines
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Record>> {
        let body = strip_bom(body);
        if !body.trim_start().starts_with('[') {
            return JsonlDecoder.decode(body);
        }

        let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })?;

        match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| into_record(item, || format!("element {i}")))
                .collect(),
            _ => Err(Error::decode("expected a JSON array of objects")),
        }
    }
}

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder (one JSON object per line)
#[derive(Debug, Clone, Default)]
pub struct JsonlDecoder;

impl JsonlDecoder {
    /// Create a new JSONL decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonlDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Record>> {
        let mut records = Vec::new();

        for (line_num, line) in strip_bom(body).lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line).map_err(|e| Error::Decode {
                message: format!("Failed to parse JSONL at line {}: {e}", line_num + 1),
            })?;

            records.push(into_record(value, || format!("line {}", line_num + 1))?);
        }

        Ok(records)
    }
}

fn into_record(value: Value, location: impl FnOnce() -> String) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::decode(format!(
            "expected an object at {}, found {}",
            location(),
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// CSV Decoder
// ============================================================================

/// CSV decoder; the first row names the columns and every cell stays a string
#[derive(Debug, Clone)]
pub struct CsvDecoder {
    /// Field delimiter
    delimiter: u8,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvDecoder {
    /// Create a new CSV decoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a CSV decoder with a custom delimiter
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl RecordDecoder for CsvDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Record>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(strip_bom(body).as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let mut records = Vec::new();

        for row in reader.records() {
            let row = row?;

            let mut record = Map::new();
            for (i, header) in headers.iter().enumerate() {
                let cell = row.get(i).unwrap_or_default();
                record.insert(header.clone(), Value::String(cell.to_string()));
            }
            records.push(record);
        }

        Ok(records)
    }
}

/// Decoder for a format
pub fn decoder_for(format: InputFormat) -> Box<dyn RecordDecoder> {
    match format {
        InputFormat::Csv => Box::new(CsvDecoder::new()),
        InputFormat::Jsonl => Box::new(JsonlDecoder::new()),
        InputFormat::Json => Box::new(JsonDecoder::new()),
    }
}

/// Read and decode an input file
pub async fn read_records(input: &InputFile) -> Result<Vec<Record>> {
    let path = input.path();
    let body = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })?;

    let format = match input {
        InputFile::Csv(_) => InputFormat::Csv,
        InputFile::Json(_) => match InputFormat::from_path(path) {
            Ok(InputFormat::Jsonl) => InputFormat::Jsonl,
            _ => InputFormat::Json,
        },
    };

    let records = decoder_for(format).decode(&body)?;
    debug!("decoded {} records from {}", records.len(), path.display());
    Ok(records)
}
