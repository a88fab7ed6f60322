//! CLI module
//!
//! `csv-dwh [FILE] [OPTIONS]` loads one file into every requested warehouse
//! and prints the job result as JSON. Options can also come from a config
//! file (`--config`) or the environment; flags win over both.

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::Runner;
