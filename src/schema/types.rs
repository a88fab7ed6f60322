//! Schema types

use serde::{Deserialize, Serialize};

/// Vendor-agnostic classification of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SemanticType {
    String,
    Boolean,
    Int,
    Float,
    Date,
    Timestamp,
    Array,
    Object,
    Json,
}

impl SemanticType {
    /// All semantic types, in declaration order
    pub const ALL: [SemanticType; 9] = [
        SemanticType::String,
        SemanticType::Boolean,
        SemanticType::Int,
        SemanticType::Float,
        SemanticType::Date,
        SemanticType::Timestamp,
        SemanticType::Array,
        SemanticType::Object,
        SemanticType::Json,
    ];

    /// True for ARRAY, OBJECT and JSON
    pub fn is_semi_structured(self) -> bool {
        matches!(
            self,
            SemanticType::Array | SemanticType::Object | SemanticType::Json
        )
    }

    /// True for INT and FLOAT
    pub fn is_numeric(self) -> bool {
        matches!(self, SemanticType::Int | SemanticType::Float)
    }

    /// Upper-case type name as serialized
    pub fn as_str(self) -> &'static str {
        match self {
            SemanticType::String => "STRING",
            SemanticType::Boolean => "BOOLEAN",
            SemanticType::Int => "INT",
            SemanticType::Float => "FLOAT",
            SemanticType::Date => "DATE",
            SemanticType::Timestamp => "TIMESTAMP",
            SemanticType::Array => "ARRAY",
            SemanticType::Object => "OBJECT",
            SemanticType::Json => "JSON",
        }
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldMode {
    #[default]
    Nullable,
    Required,
    Repeated,
}

/// One inferred column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Column name
    pub name: String,

    /// Inferred type
    #[serde(rename = "type")]
    pub field_type: SemanticType,

    /// Column mode
    #[serde(default)]
    pub mode: FieldMode,
}

impl SchemaField {
    /// Create a nullable field
    pub fn new(name: impl Into<String>, field_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            field_type,
            mode: FieldMode::Nullable,
        }
    }

    /// Override the mode
    #[must_use]
    pub fn with_mode(mut self, mode: FieldMode) -> Self {
        self.mode = mode;
        self
    }

    /// Copy of this field under a new name
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

/// Ordered columns, first-seen order
pub type Schema = Vec<SchemaField>;
