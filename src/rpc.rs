//! JSON-RPC 2.0 over HTTP
//!
//! Used for both the public chain endpoint (reads, receipts) and the local
//! wallet endpoint (accounts, transaction submission).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::BountyError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    jsonrpc: String,
    id: Option<u64>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Anything that can carry a JSON-RPC call to an endpoint
#[async_trait]
pub trait RpcTransport: Send + Sync {
    fn endpoint(&self) -> &str;

    async fn call(&self, method: &str, params: Value) -> Result<Value, BountyError>;
}

/// Minimal JSON-RPC client
pub struct RpcClient {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a new client for an endpoint
    pub fn new(url: &str) -> Self {
        // Build HTTP client with timeout, falling back to default client if builder fails
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one request and return its `result` member
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, BountyError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params: &params,
        };
        debug!("rpc -> {} {} (id {})", self.url, method, id);

        let resp = self.client.post(&self.url).json(&request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_else(|_| "Unknown error".into());
            return Err(BountyError::Rpc {
                code: i64::from(status.as_u16()),
                message: format!("HTTP {}: {}", status, error_text),
            });
        }

        let body: Value = resp.json().await?;
        parse_response(id, body)
    }
}

#[async_trait]
impl RpcTransport for RpcClient {
    fn endpoint(&self) -> &str {
        self.url()
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, BountyError> {
        RpcClient::call(self, method, params).await
    }
}

fn parse_response(id: u64, body: Value) -> Result<Value, BountyError> {
    let response: RpcResponse = serde_json::from_value(body)?;

    if response.jsonrpc != "2.0" {
        return Err(BountyError::Decode(format!(
            "wrong jsonrpc version {}",
            response.jsonrpc
        )));
    }
    if let Some(error) = response.error {
        return Err(BountyError::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    if response.id != Some(id) {
        return Err(BountyError::Decode(format!(
            "response id {:?} does not match request id {}",
            response.id, id
        )));
    }
    Ok(response.result.unwrap_or(Value::Null))
}
