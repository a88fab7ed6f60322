//! Schema inference module
//!
//! Infers a flat, vendor-agnostic column schema from loosely typed records.
//!
//! # Features
//!
//! - **Type Inference**: Classifies CSV strings and native JSON values
//! - **First-Sample Typing**: Each column takes the type of its first populated value
//! - **Stable Order**: Columns keep first-seen order across the record set

mod generator;
mod inference;
mod types;

pub use generator::{generate_schema, unique_keys};
pub use inference::{infer_str, infer_type, is_boolean_token, is_finite_number, is_iso_date};
pub use types::{FieldMode, Schema, SchemaField, SemanticType};
