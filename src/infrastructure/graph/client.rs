//! HTTP client for the graph store gateway
//!
//! The store is consumed as a black box: a single string-based `execute`
//! operation covers schema statements and upserts alike.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::AppConfig;
use crate::infrastructure::graph::error::GraphClientError;
use crate::utils::retry::RetryHandler;

/// Tabular result of one query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Value>,
}

/// The one operation the pipeline needs from the graph store
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn execute(&self, query: &str) -> Result<QueryResult, GraphClientError>;
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<QueryResult>,
}

/// Gateway-backed implementation of [`GraphStore`]
pub struct GatewayClient {
    client: Client,
    base_url: String,
    retry: RetryHandler,
}

impl GatewayClient {
    /// Create a new gateway client from the application configuration
    pub fn new(config: &AppConfig) -> Result<Self, GraphClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                GraphClientError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.gateway.url.clone(),
            retry: RetryHandler::new(),
        })
    }

    async fn execute_once(&self, query: &str) -> Result<QueryResult, GraphClientError> {
        let url = format!("{}/query", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| GraphClientError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphClientError::ResponseError(format!(
                "Gateway request failed: {} - {}",
                status, body
            )));
        }

        let result: GatewayResponse = response
            .json()
            .await
            .map_err(|e| GraphClientError::ResponseError(e.to_string()))?;

        if !result.success {
            return Err(GraphClientError::QueryError(
                result.error.unwrap_or_else(|| "Query failed".to_string()),
            ));
        }

        Ok(result.data.unwrap_or_default())
    }
}

#[async_trait]
impl GraphStore for GatewayClient {
    async fn execute(&self, query: &str) -> Result<QueryResult, GraphClientError> {
        self.retry
            .execute_with_retry(|| self.execute_once(query), "gateway query")
            .await
    }
}
