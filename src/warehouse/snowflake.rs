//! Snowflake SQL REST client
//!
//! Logs in once per client and sends statements with the session token.
//! Long statements come back with a "still running" code and a result URL
//! that is polled until the statement finishes.

use super::client::WarehouseClient;
use super::target::SnowflakeTarget;
use super::types::Namespace;
use crate::auth::AuthConfig;
use crate::dialect::Warehouse;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::retry::{retry, RetryPolicy};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

const QUERY_IN_PROGRESS: &str = "333333";
const QUERY_IN_PROGRESS_ASYNC: &str = "333334";

/// Talks to `<account>.snowflakecomputing.com`
pub struct SnowflakeClient {
    http: HttpClient,
    target: SnowflakeTarget,
    poll: RetryPolicy,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    success: bool,
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    data: QueryData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryData {
    get_result_url: Option<String>,
    query_id: Option<String>,
    #[serde(default)]
    rowset: Vec<Vec<Value>>,
    stats: Option<QueryStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryStats {
    num_rows_inserted: Option<u64>,
}

impl QueryResponse {
    fn is_running(&self) -> bool {
        matches!(
            self.code.as_deref(),
            Some(QUERY_IN_PROGRESS | QUERY_IN_PROGRESS_ASYNC)
        )
    }

    fn affected_rows(&self) -> Option<u64> {
        if let Some(n) = self.data.stats.as_ref().and_then(|s| s.num_rows_inserted) {
            return Some(n);
        }
        match self.data.rowset.first()?.first()? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl SnowflakeClient {
    /// Client for a validated target
    pub fn new(target: SnowflakeTarget, poll: RetryPolicy) -> Result<Self> {
        let base = target.access_url.trim_end_matches('/').to_string();
        let login_url = Url::parse_with_params(
            &format!("{base}/session/v1/login-request"),
            &[
                ("databaseName", target.database.as_str()),
                ("schemaName", target.schema.as_str()),
                ("warehouse", target.warehouse.as_str()),
                ("roleName", target.role.as_str()),
            ],
        )?;

        let auth = AuthConfig::Session {
            login_url: login_url.to_string(),
            login_body: json!({
                "data": {
                    "ACCOUNT_NAME": target.account,
                    "LOGIN_NAME": target.user,
                    "PASSWORD": target.password,
                    "CLIENT_APP_ID": crate::NAME,
                    "CLIENT_APP_VERSION": crate::VERSION,
                }
            }),
            token_path: "data.token".to_string(),
            token_header: "Authorization".to_string(),
            token_format: "Snowflake Token=\"{token}\"".to_string(),
            expires_in_path: Some("data.validityInSeconds".to_string()),
        };

        let config = HttpClientConfig::builder()
            .base_url(base)
            .header("Accept", "application/json")
            .build();

        Ok(Self {
            http: HttpClient::with_auth(config, auth)?,
            target,
            poll,
        })
    }

    async fn fetch_result(&self, result_url: &str) -> Result<QueryResponse> {
        let response: QueryResponse = self.http.get_json(result_url).await?;
        if response.is_running() {
            return Err(Error::StatementPending {
                statement_id: result_url.to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl WarehouseClient for SnowflakeClient {
    fn warehouse(&self) -> Warehouse {
        Warehouse::Snowflake
    }

    fn namespace(&self) -> Namespace {
        Namespace::Database(self.target.database.clone())
    }

    fn table_prefix(&self) -> Vec<String> {
        vec![self.target.database.clone(), self.target.schema.clone()]
    }

    async fn execute(&self, sql: &str) -> Result<Option<u64>> {
        debug!("snowflake: {}", sql);
        let config = RequestConfig::new()
            .query("requestId", uuid::Uuid::new_v4().to_string())
            .json(json!({
                "sqlText": sql,
                "asyncExec": false,
                "sequenceId": 1,
                "queryContextDTO": {},
            }));

        let mut response: QueryResponse = self
            .http
            .request_json(Method::POST, "/queries/v1/query-request", config)
            .await?;

        if response.is_running() {
            let result_url = response.data.get_result_url.clone().ok_or_else(|| {
                Error::warehouse(Warehouse::Snowflake, "running query without a result URL")
            })?;
            debug!(
                "snowflake: polling query {}",
                response.data.query_id.as_deref().unwrap_or("?")
            );
            response = retry(&self.poll, |_| self.fetch_result(&result_url), Error::is_pending).await?;
        }

        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "statement failed".to_string());
            return Err(Error::warehouse(Warehouse::Snowflake, message));
        }

        Ok(response.affected_rows())
    }
}
