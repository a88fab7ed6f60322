//! Redshift Serverless through the Data API
//!
//! Every call is a SigV4-signed JSON POST to the regional endpoint. Statements
//! run asynchronously: `ExecuteStatement` returns an id that is described
//! until it finishes.

use super::client::WarehouseClient;
use super::target::RedshiftTarget;
use super::types::Namespace;
use crate::auth::AuthConfig;
use crate::dialect::Warehouse;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::retry::{retry, RetryPolicy};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const SERVICE: &str = "redshift-data";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Talks to `redshift-data.<region>.amazonaws.com`
pub struct RedshiftClient {
    http: HttpClient,
    target: RedshiftTarget,
    poll: RetryPolicy,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ExecuteStatementOutput {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStatementOutput {
    status: String,
    error: Option<String>,
    result_rows: Option<i64>,
}

impl RedshiftClient {
    /// Client for a validated target
    pub fn new(target: RedshiftTarget, poll: RetryPolicy) -> Result<Self> {
        let auth = AuthConfig::AwsSigV4 {
            access_key_id: target.access_key_id.clone(),
            secret_access_key: target.secret_access_key.clone(),
            session_token: target.session_token.clone(),
            region: target.region.clone(),
            service: SERVICE.to_string(),
        };

        let config = HttpClientConfig::builder()
            .base_url(target.api_url.clone())
            .build();

        Ok(Self {
            http: HttpClient::with_auth(config, auth)?,
            target,
            poll,
        })
    }

    async fn call<T: DeserializeOwned>(&self, operation: &str, body: Value) -> Result<T> {
        let config = RequestConfig::new()
            .header("Content-Type", CONTENT_TYPE)
            .header("X-Amz-Target", format!("RedshiftData.{operation}"))
            .json(body);
        self.http.request_json(Method::POST, "/", config).await
    }

    async fn describe(&self, id: &str) -> Result<Option<u64>> {
        let output: DescribeStatementOutput =
            self.call("DescribeStatement", json!({ "Id": id })).await?;

        match output.status.as_str() {
            "FINISHED" => Ok(output
                .result_rows
                .and_then(|n| u64::try_from(n).ok())),
            "FAILED" | "ABORTED" => Err(Error::warehouse(
                Warehouse::Redshift,
                output
                    .error
                    .unwrap_or_else(|| format!("statement {id} {}", output.status.to_lowercase())),
            )),
            _ => Err(Error::StatementPending {
                statement_id: id.to_string(),
            }),
        }
    }
}

#[async_trait]
impl WarehouseClient for RedshiftClient {
    fn warehouse(&self) -> Warehouse {
        Warehouse::Redshift
    }

    fn namespace(&self) -> Namespace {
        Namespace::Database(self.target.database.clone())
    }

    fn table_prefix(&self) -> Vec<String> {
        vec![self.target.schema_name.clone()]
    }

    async fn execute(&self, sql: &str) -> Result<Option<u64>> {
        debug!("redshift: {}", sql);
        let output: ExecuteStatementOutput = self
            .call(
                "ExecuteStatement",
                json!({
                    "WorkgroupName": self.target.workgroup,
                    "Database": self.target.database,
                    "Sql": sql,
                }),
            )
            .await?;

        retry(&self.poll, |_| self.describe(&output.id), Error::is_pending).await
    }
}
