//! # csv-dwh
//!
//! Load CSV and JSON files of unknown shape into BigQuery, Snowflake,
//! Redshift and Databricks.
//!
//! ## Features
//!
//! - **Type Inference**: Each column is typed from its first populated value
//! - **Identifier Sanitization**: Column and table names made legal everywhere, collisions numbered
//! - **Vendor Dialects**: One type map, quoting and literal format per warehouse
//! - **Batched Loads**: Sequential batches with per-batch partial-failure accounting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csv_dwh::{config::JobConfig, engine::Job, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = JobConfig {
//!         csv_file: Some("orders.csv".into()),
//!         warehouse: vec!["snowflake".into()],
//!         // snowflake_* credentials ...
//!         ..JobConfig::default()
//!     };
//!
//!     let result = Job::new(config).run().await?;
//!     println!("{} rows in {}", result.total_rows, result.clock_time);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Job (engine)                          │
//! │  decode → generate_schema → batch_data → load per warehouse  │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────┬───────────┬──────┴──────┬────────────┬───────────┐
//! │  Schema  │  Naming   │   Dialect   │ Warehouse  │   HTTP    │
//! ├──────────┼───────────┼─────────────┼────────────┼───────────┤
//! │ Infer    │ Headers   │ Type map    │ Loader     │ Retry     │
//! │ Generate │ Tables    │ DDL         │ BigQuery   │ JWT       │
//! │          │           │ Literals    │ Snowflake  │ Session   │
//! │          │           │ Inserts     │ Redshift   │ SigV4     │
//! │          │           │             │ Databricks │           │
//! └──────────┴───────────┴─────────────┴────────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Schema inference
pub mod schema;

/// Identifier sanitization
pub mod naming;

/// Vendor type maps, quoting and SQL generation
pub mod dialect;

/// Batch planning
pub mod batch;

/// Retry combinator
pub mod retry;

/// HTTP client with retry
pub mod http;

/// Authentication implementations
pub mod auth;

/// Warehouse clients and the table loader
pub mod warehouse;

/// Job configuration
pub mod config;

/// Input decoders (CSV, JSON, JSON Lines)
pub mod decode;

/// Job orchestration
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::JobConfig;
pub use engine::{Job, JobResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
