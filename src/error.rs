//! Error types for csv-dwh
//!
//! This module defines the error hierarchy for the whole loader.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Batch-level insert failures are not errors at this level: the warehouse
//! loader records them in the per-batch `InsertResult` and keeps going.
//! Everything that reaches the caller as an `Error` aborts the job.

use thiserror::Error;

/// The main error type for csv-dwh
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{field} is required")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Unknown warehouse '{name}' (expected one of: bigquery, snowflake, redshift, databricks)")]
    UnknownWarehouse { name: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to decode input: {message}")]
    Decode { message: String },

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("JWT generation failed: {message}")]
    JwtGeneration { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Warehouse Errors
    // ============================================================================
    #[error("{warehouse} error: {message}")]
    Warehouse { warehouse: String, message: String },

    #[error("Table '{table}' not found")]
    TableNotFound { table: String },

    #[error("Failed to create table '{table}': {message}")]
    TableCreation { table: String, message: String },

    #[error("Table '{table}' not ready after {attempts} attempts")]
    TableNotReady { table: String, attempts: u32 },

    #[error("Statement still running: {statement_id}")]
    StatementPending { statement_id: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a vendor-side warehouse error
    pub fn warehouse(warehouse: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::Warehouse {
            warehouse: warehouse.to_string(),
            message: message.into(),
        }
    }

    /// Create a table creation error
    pub fn table_creation(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TableCreation {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_)
            | Error::RateLimited { .. }
            | Error::Timeout { .. }
            | Error::StatementPending { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if this error means a freshly created table is not visible yet
    pub fn is_table_not_found(&self) -> bool {
        match self {
            Error::TableNotFound { .. } => true,
            Error::HttpStatus { status, body } => *status == 404 && body.contains("Not found: Table"),
            _ => false,
        }
    }

    /// Check if this error is a pending asynchronous statement
    pub fn is_pending(&self) -> bool {
        matches!(self, Error::StatementPending { .. })
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for csv-dwh
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
