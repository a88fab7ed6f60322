//! Decoder types and traits

use crate::error::{Error, Result};
use crate::types::Record;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// CSV with a header row
    Csv,
    /// One JSON object per line
    Jsonl,
    /// A JSON array of objects, or JSON Lines
    Json,
}

impl InputFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "jsonl" | "ndjson" => Ok(Self::Jsonl),
            "json" => Ok(Self::Json),
            _ => Err(Error::config(format!(
                "cannot tell the format of {} (expected .csv, .json, .jsonl or .ndjson)",
                path.display()
            ))),
        }
    }
}

/// The file a job reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFile {
    /// Parsed as CSV; every cell stays a string
    Csv(PathBuf),
    /// Parsed as JSON or JSON Lines; values keep their JSON types
    Json(PathBuf),
}

impl InputFile {
    /// Path on disk
    pub fn path(&self) -> &Path {
        match self {
            InputFile::Csv(path) | InputFile::Json(path) => path,
        }
    }

    /// File name without extension, the default table name
    pub fn stem(&self) -> Option<&str> {
        self.path().file_stem().and_then(|s| s.to_str())
    }
}

/// Trait for decoding a file body into records
pub trait RecordDecoder: Send + Sync {
    /// Decode the body into a list of records
    fn decode(&self, body: &str) -> Result<Vec<Record>>;
}
