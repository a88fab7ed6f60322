//! BigQuery REST v2 client

use super::client::{outcome_from_affected, WarehouseClient};
use super::target::BigQueryTarget;
use super::types::{InsertOutcome, Namespace, TableHandle};
use crate::auth::AuthConfig;
use crate::dialect::{InsertBody, InsertPayload, Warehouse};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::retry::{retry, RetryPolicy};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::debug;

/// OAuth scope for BigQuery
pub const BIGQUERY_SCOPE: &str = "https://www.googleapis.com/auth/bigquery";

/// Talks to `bigquery.googleapis.com` with a service account
pub struct BigQueryClient {
    http: HttpClient,
    target: BigQueryTarget,
    poll: RetryPolicy,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    job_complete: bool,
    job_reference: Option<JobReference>,
    num_dml_affected_rows: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorProto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    job_id: String,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorProto {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertAllResponse {
    #[serde(default)]
    insert_errors: Vec<RowErrors>,
}

#[derive(Debug, Deserialize)]
struct RowErrors {
    index: usize,
    #[serde(default)]
    errors: Vec<ErrorProto>,
}

impl BigQueryClient {
    /// Client for a validated target
    pub fn new(target: BigQueryTarget, poll: RetryPolicy) -> Result<Self> {
        let key = &target.credentials;
        let mut claims = HashMap::new();
        claims.insert("scope".to_string(), BIGQUERY_SCOPE.to_string());

        let auth = AuthConfig::Jwt {
            issuer: key.client_email.clone(),
            subject: None,
            audience: key.token_uri.clone(),
            private_key: key.private_key.clone(),
            token_lifetime_seconds: 3600,
            claims,
            token_url: Some(key.token_uri.clone()),
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

    fn project_path(&self) -> String {
        format!("/bigquery/v2/projects/{}", self.target.project)
    }

    fn table_path(&self, table: &str) -> String {
        format!(
            "{}/datasets/{}/tables/{table}",
            self.project_path(),
            self.target.dataset
        )
    }

    async fn query_results(&self, job: &JobReference) -> Result<QueryResponse> {
        let mut config = RequestConfig::new().query("maxResults", "0");
        if let Some(ref location) = job.location {
            config = config.query("location", location.clone());
        }
        let url = format!("{}/queries/{}", self.project_path(), job.job_id);

        let response: QueryResponse = self.http.request_json(Method::GET, &url, config).await?;
        if response.job_complete {
            Ok(response)
        } else {
            Err(Error::StatementPending {
                statement_id: job.job_id.clone(),
            })
        }
    }
}

#[async_trait]
impl WarehouseClient for BigQueryClient {
    fn warehouse(&self) -> Warehouse {
        Warehouse::BigQuery
    }

    fn namespace(&self) -> Namespace {
        Namespace::Dataset(self.target.dataset.clone())
    }

    fn table_prefix(&self) -> Vec<String> {
        vec![self.target.project.clone(), self.target.dataset.clone()]
    }

    async fn prepare(&self) -> Result<()> {
        let body = json!({
            "datasetReference": {
                "projectId": self.target.project,
                "datasetId": self.target.dataset,
            }
        });
        let url = format!("{}/datasets", self.project_path());

        match self.http.post(&url, body).await {
            Ok(_) => {
                debug!("created dataset {}", self.target.dataset);
                Ok(())
            }
            Err(Error::HttpStatus { status: 409, .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn execute(&self, sql: &str) -> Result<Option<u64>> {
        debug!("bigquery: {}", sql);
        let url = format!("{}/queries", self.project_path());
        let body = json!({ "query": sql, "useLegacySql": false });

        let mut response: QueryResponse = self.http.post_json(&url, body).await?;

        if !response.job_complete {
            let job = response.job_reference.ok_or_else(|| {
                Error::warehouse(Warehouse::BigQuery, "query response without a job reference")
            })?;
            response = retry(&self.poll, |_| self.query_results(&job), Error::is_pending).await?;
        }

        if let Some(error) = response.errors.first() {
            return Err(Error::warehouse(Warehouse::BigQuery, error.message.clone()));
        }

        Ok(response
            .num_dml_affected_rows
            .and_then(|n| n.parse().ok()))
    }

    async fn probe_table(&self, table: &str) -> Result<()> {
        match self.http.get(&self.table_path(table)).await {
            Ok(_) => Ok(()),
            Err(Error::HttpStatus { status: 404, .. }) => Err(Error::TableNotFound {
                table: table.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    async fn insert(&self, table: &TableHandle, payload: &InsertPayload) -> Result<InsertOutcome> {
        let rows = match &payload.body {
            InsertBody::Rows(rows) => rows,
            InsertBody::Sql(sql) => {
                let affected = self.execute(sql).await?;
                return Ok(outcome_from_affected(payload.rows, affected));
            }
        };

        let body = json!({
            "skipInvalidRows": true,
            "rows": rows
                .iter()
                .map(|row| json!({ "insertId": uuid::Uuid::new_v4().to_string(), "json": row }))
                .collect::<Vec<Value>>(),
        });
        let url = format!("{}/insertAll", self.table_path(&table.name));

        let response: InsertAllResponse = self.http.post_json(&url, body).await?;

        let failed = response.insert_errors.len().min(payload.rows);
        let errors = response
            .insert_errors
            .iter()
            .flat_map(|row| {
                row.errors
                    .iter()
                    .map(move |e| format!("row {}: {}", row.index, e.message))
            })
            .collect();

        Ok(InsertOutcome {
            inserted: payload.rows - failed,
            failed,
            errors,
        })
    }
}
