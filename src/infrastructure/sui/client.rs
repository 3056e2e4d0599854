//! JSON-RPC client for the Sui full node

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::AppConfig;
use crate::domain::models::address::to_rpc_address;
use crate::infrastructure::sui::error::SuiClientError;
use crate::utils::retry::RetryHandler;

const MIST_PER_SUI: f64 = 1_000_000_000.0;

/// One checkpoint: an ordered batch of finalized transaction digests
#[derive(Debug, Clone)]
pub struct Checkpoint {
    /// Checkpoint commit time (epoch ms)
    pub timestamp_ms: i64,
    /// Digests of the transactions finalized in this checkpoint
    pub transactions: Vec<String>,
}

/// Remote operations the collector needs from a Sui full node
#[async_trait]
pub trait SuiRpc: Send + Sync {
    /// Sequence number of the chain's current head checkpoint
    async fn latest_checkpoint_sequence_number(&self) -> Result<u64, SuiClientError>;

    /// Fetch one checkpoint by sequence number
    async fn get_checkpoint(&self, seq: u64) -> Result<Checkpoint, SuiClientError>;

    /// Fetch one decoded transaction block with input and effects
    async fn get_transaction_block(&self, digest: &str) -> Result<Value, SuiClientError>;

    /// Account balance in SUI (enhanced mode)
    async fn get_balance(&self, address: &str) -> Result<f64, SuiClientError>;

    /// Number of objects the account owns (enhanced mode)
    async fn get_owned_objects_count(&self, address: &str) -> Result<u64, SuiClientError>;

    /// Whether the account owns a published package (enhanced mode)
    async fn is_contract(&self, address: &str) -> Result<bool, SuiClientError>;
}

/// HTTP implementation of [`SuiRpc`] against a full node URL
pub struct HttpSuiClient {
    client: Client,
    rpc_url: String,
    retry: RetryHandler,
}

impl HttpSuiClient {
    /// Create a new client from the application configuration
    pub fn new(config: &AppConfig) -> Result<Self, SuiClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.sui.timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                SuiClientError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            rpc_url: config.sui.rpc_url.clone(),
            retry: RetryHandler::new(),
        })
    }

    /// Make one JSON-RPC 2.0 call, retried at the transport boundary
    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, SuiClientError> {
        self.retry
            .execute_with_retry(|| self.rpc_call_once(method, params.clone()), method)
            .await
    }

    async fn rpc_call_once(&self, method: &str, params: Value) -> Result<Value, SuiClientError> {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| SuiClientError::NetworkError(e.to_string()))?;

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| SuiClientError::ParseError(e.to_string()))?;

        if let Some(error) = response_json.get("error") {
            return Err(SuiClientError::RpcError {
                method: method.to_string(),
                message: error.to_string(),
            });
        }

        response_json
            .get("result")
            .cloned()
            .ok_or_else(|| SuiClientError::ParseError("No result in response".to_string()))
    }
}

#[async_trait]
impl SuiRpc for HttpSuiClient {
    async fn latest_checkpoint_sequence_number(&self) -> Result<u64, SuiClientError> {
        let result = self
            .rpc_call("sui_getLatestCheckpointSequenceNumber", json!([]))
            .await?;
        parse_u64(&result)
            .ok_or_else(|| SuiClientError::ParseError("Invalid checkpoint number".to_string()))
    }

    async fn get_checkpoint(&self, seq: u64) -> Result<Checkpoint, SuiClientError> {
        let result = self
            .rpc_call("sui_getCheckpoint", json!([seq.to_string()]))
            .await?;

        let timestamp_ms = result
            .get("timestampMs")
            .and_then(parse_i64)
            .ok_or_else(|| SuiClientError::ParseError("Invalid checkpoint timestamp".to_string()))?;

        let transactions = result
            .get("transactions")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                SuiClientError::ParseError("Checkpoint has no transaction list".to_string())
            })?
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();

        Ok(Checkpoint {
            timestamp_ms,
            transactions,
        })
    }

    async fn get_transaction_block(&self, digest: &str) -> Result<Value, SuiClientError> {
        self.rpc_call(
            "sui_getTransactionBlock",
            json!([
                digest,
                {
                    "showInput": true,
                    "showRawInput": true,
                    "showEffects": true,
                }
            ]),
        )
        .await
    }

    async fn get_balance(&self, address: &str) -> Result<f64, SuiClientError> {
        let result = self
            .rpc_call("suix_getBalance", json!([to_rpc_address(address)]))
            .await?;
        let total = result
            .get("totalBalance")
            .and_then(parse_u64)
            .ok_or_else(|| SuiClientError::ParseError("Invalid balance response".to_string()))?;
        Ok(total as f64 / MIST_PER_SUI)
    }

    async fn get_owned_objects_count(&self, address: &str) -> Result<u64, SuiClientError> {
        let result = self
            .rpc_call(
                "suix_getOwnedObjects",
                json!([
                    to_rpc_address(address),
                    {
                        "showType": true,
                        "showOwner": false,
                        "showPreviousTransaction": false,
                        "showDisplay": false,
                        "showContent": false,
                        "showBcs": false,
                        "showStorageRebate": false,
                    }
                ]),
            )
            .await?;
        Ok(result
            .get("data")
            .and_then(Value::as_array)
            .map(|data| data.len() as u64)
            .unwrap_or(0))
    }

    async fn is_contract(&self, address: &str) -> Result<bool, SuiClientError> {
        let result = self
            .rpc_call(
                "suix_getOwnedObjects",
                json!([
                    to_rpc_address(address),
                    {
                        "filter": { "StructType": "0x2::package::Package" },
                        "showType": true,
                    }
                ]),
            )
            .await?;
        Ok(result
            .get("data")
            .and_then(Value::as_array)
            .map(|data| !data.is_empty())
            .unwrap_or(false))
    }
}

/// Numeric fields come back as decimal strings on most endpoints and as
/// bare numbers on a few; accept both.
fn parse_u64(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse::<u64>().ok()))
}

fn parse_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse::<i64>().ok()))
}
