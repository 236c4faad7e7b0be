//! Wallet provider boundary
//!
//! A provider is whatever mediates account access and transaction submission:
//! anything that accepts `request({method, params})`. The flow only talks to
//! the [`WalletProvider`] trait so tests can swap in a recording mock.

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::BountyError;
use crate::rpc::{RpcClient, RpcTransport};

/// Parameters of `eth_sendTransaction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Raw `request({method, params})`
    async fn request(&self, method: &str, params: Value) -> Result<Value, BountyError>;

    /// `eth_requestAccounts`, parsed into addresses
    async fn request_accounts(&self) -> Result<Vec<Address>, BountyError> {
        let accounts = self.request("eth_requestAccounts", json!([])).await?;
        parse_accounts(accounts)
    }

    /// `eth_sendTransaction`, returning the transaction hash
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, BountyError> {
        let hash = self
            .request("eth_sendTransaction", json!([tx]))
            .await?;
        serde_json::from_value(hash)
            .map_err(|e| BountyError::Decode(format!("invalid transaction hash: {}", e)))
    }
}

fn parse_accounts(value: Value) -> Result<Vec<Address>, BountyError> {
    match value {
        Value::Null => Ok(Vec::new()),
        other => serde_json::from_value(other)
            .map_err(|e| BountyError::Decode(format!("invalid account list: {}", e))),
    }
}

/// Provider backed by a wallet's local JSON-RPC endpoint
pub struct HttpWalletProvider {
    transport: Box<dyn RpcTransport>,
}

impl HttpWalletProvider {
    pub fn new(url: &str) -> Self {
        Self::with_transport(RpcClient::new(url))
    }

    pub fn with_transport(transport: impl RpcTransport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    pub fn url(&self) -> &str {
        self.transport.endpoint()
    }
}

#[async_trait]
impl WalletProvider for HttpWalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, BountyError> {
        match self.transport.call(method, params.clone()).await {
            // Plain nodes only know eth_accounts
            Err(e) if method == "eth_requestAccounts" && e.is_unsupported_method() => {
                warn!("{} does not support eth_requestAccounts, using eth_accounts", self.url());
                self.transport.call("eth_accounts", params).await
            }
            other => {
                debug!("wallet {} answered {}", self.url(), method);
                other
            }
        }
    }
}
