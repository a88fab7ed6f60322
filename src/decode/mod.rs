//! Input decoder module
//!
//! Supports: CSV, JSON Lines, JSON arrays
//!
//! # Overview
//!
//! Turns an input file into records. CSV cells are kept as strings so type
//! inference sees exactly what was in the file; JSON values keep their
//! native types. Key order follows the file.

mod decoders;
mod types;

pub use decoders::{decoder_for, read_records, CsvDecoder, JsonDecoder, JsonlDecoder};
pub use types::{InputFile, InputFormat, RecordDecoder};

#[cfg(test)]
mod tests;
