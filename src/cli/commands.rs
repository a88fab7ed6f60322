//! CLI arguments

use crate::config::clean;
use crate::decode::InputFormat;
use crate::error::Result;
use crate::types::JsonObject;
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// Load a CSV or JSON file into one or more data warehouses
#[derive(Parser, Serialize, Debug, Default)]
#[command(name = "csv-dwh")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file (.csv, .json, .jsonl or .ndjson)
    #[serde(skip)]
    pub file: Option<PathBuf>,

    /// YAML or JSON file with any of the options below
    #[arg(long)]
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Target warehouses: bigquery, snowflake, redshift, databricks [default: bigquery]
    #[arg(short, long, value_delimiter = ',')]
    pub warehouse: Vec<String>,

    /// Rows per insert, 0 for a single batch [default: 1000]
    #[arg(short, long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,

    /// Table name [default: input file name]
    #[arg(short, long)]
    pub table_name: Option<String>,

    /// Create tables without inserting rows
    #[arg(short, long)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,

    /// Debug logging
    #[arg(short, long)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub verbose: bool,

    /// CSV input
    #[arg(long, conflicts_with = "json_file")]
    pub csv_file: Option<PathBuf>,

    /// JSON or JSON Lines input
    #[arg(long)]
    pub json_file: Option<PathBuf>,

    /// Also write the result to this file
    #[arg(long)]
    pub write_logs: Option<PathBuf>,

    // BigQuery
    /// BigQuery dataset
    #[arg(long, help_heading = "BigQuery")]
    pub bigquery_dataset: Option<String>,
    /// BigQuery project [default: the key file's project]
    #[arg(long, help_heading = "BigQuery")]
    pub bigquery_project: Option<String>,
    /// Service account key file
    #[arg(long, help_heading = "BigQuery")]
    pub bigquery_keyfile: Option<PathBuf>,
    /// Service account email
    #[arg(long, help_heading = "BigQuery")]
    pub bigquery_service_account: Option<String>,
    /// Service account private key
    #[arg(long, help_heading = "BigQuery")]
    pub bigquery_service_account_pass: Option<String>,
    /// BigQuery API base URL
    #[arg(long, help_heading = "BigQuery")]
    pub bigquery_api_url: Option<String>,

    // Snowflake
    /// Snowflake account identifier
    #[arg(long, help_heading = "Snowflake")]
    pub snowflake_account: Option<String>,
    /// Snowflake user
    #[arg(long, help_heading = "Snowflake")]
    pub snowflake_user: Option<String>,
    /// Snowflake password
    #[arg(long, help_heading = "Snowflake")]
    pub snowflake_password: Option<String>,
    /// Snowflake database
    #[arg(long, help_heading = "Snowflake")]
    pub snowflake_database: Option<String>,
    /// Snowflake schema
    #[arg(long, help_heading = "Snowflake")]
    pub snowflake_schema: Option<String>,
    /// Snowflake virtual warehouse
    #[arg(long, help_heading = "Snowflake")]
    pub snowflake_warehouse: Option<String>,
    /// Snowflake role
    #[arg(long, help_heading = "Snowflake")]
    pub snowflake_role: Option<String>,
    /// Snowflake account URL
    #[arg(long, help_heading = "Snowflake")]
    pub snowflake_access_url: Option<String>,

    // Redshift
    /// Redshift Serverless workgroup
    #[arg(long, help_heading = "Redshift")]
    pub redshift_workgroup: Option<String>,
    /// Redshift database
    #[arg(long, help_heading = "Redshift")]
    pub redshift_database: Option<String>,
    /// AWS access key id
    #[arg(long, help_heading = "Redshift")]
    pub redshift_access_key_id: Option<String>,
    /// AWS secret access key
    #[arg(long, help_heading = "Redshift")]
    pub redshift_secret_access_key: Option<String>,
    /// AWS session token
    #[arg(long, help_heading = "Redshift")]
    pub redshift_session_token: Option<String>,
    /// AWS region [default: us-west-2]
    #[arg(long, help_heading = "Redshift")]
    pub redshift_region: Option<String>,
    /// Redshift schema [default: public]
    #[arg(long, help_heading = "Redshift")]
    pub redshift_schema_name: Option<String>,
    /// Redshift Data API base URL
    #[arg(long, help_heading = "Redshift")]
    pub redshift_api_url: Option<String>,

    // Databricks
    /// Databricks workspace host
    #[arg(long, help_heading = "Databricks")]
    pub databricks_host: Option<String>,
    /// SQL warehouse HTTP path
    #[arg(long, help_heading = "Databricks")]
    pub databricks_http_path: Option<String>,
    /// Personal access token
    #[arg(long, help_heading = "Databricks")]
    pub databricks_token: Option<String>,
    /// Databricks database [default: default]
    #[arg(long, help_heading = "Databricks")]
    pub databricks_database: Option<String>,
}

impl Cli {
    /// Options given on the command line, as a config layer
    ///
    /// The positional file is routed to `csv_file` or `json_file` by its
    /// extension.
    pub fn layer(&self) -> Result<JsonObject> {
        let mut layer = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        };

        if let Some(ref file) = self.file {
            let key = match InputFormat::from_path(file)? {
                InputFormat::Csv => "csv_file",
                InputFormat::Json | InputFormat::Jsonl => "json_file",
            };
            layer.insert(key.to_string(), Value::String(file.display().to_string()));
        }

        Ok(clean(layer))
    }
}
