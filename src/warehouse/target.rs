//! Validated connection details, one variant per warehouse
//!
//! Built from a [`JobConfig`](crate::config::JobConfig) before any I/O
//! happens, so a missing credential fails the job up front.

use super::types::Namespace;
use crate::dialect::Warehouse;
use serde::Deserialize;

/// Default Google OAuth token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Default BigQuery REST endpoint
pub const BIGQUERY_API_URL: &str = "https://bigquery.googleapis.com";

/// The parts of a Google service-account key file the loader uses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account email, the JWT issuer
    pub client_email: String,
    /// PEM private key
    pub private_key: String,
    /// Token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// Project the key belongs to
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

/// BigQuery connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigQueryTarget {
    /// GCP project
    pub project: String,
    /// Dataset tables are created in
    pub dataset: String,
    /// Service account credentials
    pub credentials: ServiceAccountKey,
    /// REST endpoint
    pub api_url: String,
}

/// Snowflake connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnowflakeTarget {
    /// Account identifier
    pub account: String,
    /// Login name
    pub user: String,
    /// Password
    pub password: String,
    /// Database
    pub database: String,
    /// Schema within the database
    pub schema: String,
    /// Virtual warehouse
    pub warehouse: String,
    /// Role
    pub role: String,
    /// Account URL, `https://<account>.snowflakecomputing.com` unless overridden
    pub access_url: String,
}

/// Redshift Serverless connection through the Data API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedshiftTarget {
    /// Serverless workgroup
    pub workgroup: String,
    /// Database
    pub database: String,
    /// Schema tables are created in
    pub schema_name: String,
    /// AWS region
    pub region: String,
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Session token for temporary credentials
    pub session_token: Option<String>,
    /// Data API endpoint
    pub api_url: String,
}

/// Databricks SQL warehouse connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabricksTarget {
    /// Workspace URL
    pub host: String,
    /// SQL warehouse HTTP path, ending in the warehouse id
    pub http_path: String,
    /// Personal access token
    pub token: String,
    /// Database (schema) tables are created in
    pub database: String,
}

impl DatabricksTarget {
    /// Warehouse id: the last segment of the HTTP path
    pub fn warehouse_id(&self) -> &str {
        self.http_path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }

    /// Workspace URL with a scheme
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }
}

/// Everything needed to connect to one warehouse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarehouseTarget {
    /// Google BigQuery
    BigQuery(BigQueryTarget),
    /// Snowflake
    Snowflake(SnowflakeTarget),
    /// Amazon Redshift Serverless
    Redshift(RedshiftTarget),
    /// Databricks SQL
    Databricks(DatabricksTarget),
}

impl WarehouseTarget {
    /// Which warehouse this targets
    pub fn warehouse(&self) -> Warehouse {
        match self {
            WarehouseTarget::BigQuery(_) => Warehouse::BigQuery,
            WarehouseTarget::Snowflake(_) => Warehouse::Snowflake,
            WarehouseTarget::Redshift(_) => Warehouse::Redshift,
            WarehouseTarget::Databricks(_) => Warehouse::Databricks,
        }
    }

    /// Dataset or database tables land in
    pub fn namespace(&self) -> Namespace {
        match self {
            WarehouseTarget::BigQuery(t) => Namespace::Dataset(t.dataset.clone()),
            WarehouseTarget::Snowflake(t) => Namespace::Database(t.database.clone()),
            WarehouseTarget::Redshift(t) => Namespace::Database(t.database.clone()),
            WarehouseTarget::Databricks(t) => Namespace::Database(t.database.clone()),
        }
    }

    /// Identifier parts that precede the table name
    pub fn table_prefix(&self) -> Vec<&str> {
        match self {
            WarehouseTarget::BigQuery(t) => vec![t.project.as_str(), t.dataset.as_str()],
            WarehouseTarget::Snowflake(t) => vec![t.database.as_str(), t.schema.as_str()],
            WarehouseTarget::Redshift(t) => vec![t.schema_name.as_str()],
            WarehouseTarget::Databricks(t) => vec![t.database.as_str()],
        }
    }
}
