//! Databricks SQL Statement Execution API client

use super::client::WarehouseClient;
use super::target::DatabricksTarget;
use super::types::Namespace;
use crate::auth::AuthConfig;
use crate::dialect::Warehouse;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::retry::{retry, RetryPolicy};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const STATEMENTS_PATH: &str = "/api/2.0/sql/statements";

/// Talks to a workspace's SQL warehouse with a personal access token
pub struct DatabricksClient {
    http: HttpClient,
    target: DatabricksTarget,
    poll: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct StatementResponse {
    statement_id: String,
    status: StatementStatus,
    result: Option<StatementResult>,
}

#[derive(Debug, Deserialize)]
struct StatementStatus {
    state: String,
    error: Option<StatementError>,
}

#[derive(Debug, Deserialize)]
struct StatementError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    data_array: Vec<Vec<Value>>,
}

impl StatementResponse {
    /// Finished rows affected, a pending marker, or the failure
    fn settle(self) -> Result<Option<u64>> {
        match self.status.state.as_str() {
            "SUCCEEDED" => Ok(self
                .result
                .and_then(|r| r.data_array.into_iter().next())
                .and_then(|row| row.into_iter().next())
                .and_then(|cell| match cell {
                    Value::String(s) => s.parse().ok(),
                    Value::Number(n) => n.as_u64(),
                    _ => None,
                })),
            "PENDING" | "RUNNING" => Err(Error::StatementPending {
                statement_id: self.statement_id,
            }),
            state => Err(Error::warehouse(
                Warehouse::Databricks,
                self.status
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| format!("statement {}", state.to_lowercase())),
            )),
        }
    }
}

impl DatabricksClient {
    /// Client for a validated target
    pub fn new(target: DatabricksTarget, poll: RetryPolicy) -> Result<Self> {
        let config = HttpClientConfig::builder()
            .base_url(target.base_url())
            .build();
        let auth = AuthConfig::Bearer {
            token: target.token.clone(),
        };

        Ok(Self {
            http: HttpClient::with_auth(config, auth)?,
            target,
            poll,
        })
    }

    async fn status(&self, statement_id: &str) -> Result<Option<u64>> {
        let response: StatementResponse = self
            .http
            .get_json(&format!("{STATEMENTS_PATH}/{statement_id}"))
            .await?;
        response.settle()
    }
}

#[async_trait]
impl WarehouseClient for DatabricksClient {
    fn warehouse(&self) -> Warehouse {
        Warehouse::Databricks
    }

    fn namespace(&self) -> Namespace {
        Namespace::Database(self.target.database.clone())
    }

    fn table_prefix(&self) -> Vec<String> {
        vec![self.target.database.clone()]
    }

    async fn execute(&self, sql: &str) -> Result<Option<u64>> {
        debug!("databricks: {}", sql);
        let body = json!({
            "warehouse_id": self.target.warehouse_id(),
            "statement": sql,
            "wait_timeout": "30s",
            "on_wait_timeout": "CONTINUE",
        });

        let response: StatementResponse = self.http.post_json(STATEMENTS_PATH, body).await?;
        let statement_id = response.statement_id.clone();

        match response.settle() {
            Err(e) if e.is_pending() => {
                retry(&self.poll, |_| self.status(&statement_id), Error::is_pending).await
            }
            other => other,
        }
    }
}
