//! Read-only contract calls against the public chain endpoint

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::contracts::{bounty_count_calldata, decode_bounty_count};
use crate::error::BountyError;
use crate::rpc::RpcClient;

#[async_trait]
pub trait ContractReader: Send + Sync {
    /// Current value of `bountyCount()` on the bounty contract
    async fn bounty_count(&self) -> Result<U256, BountyError>;
}

/// `eth_call` reader over JSON-RPC
pub struct RpcContractReader {
    rpc: Arc<RpcClient>,
    contract: Address,
}

impl RpcContractReader {
    pub fn new(rpc: Arc<RpcClient>, contract: Address) -> Self {
        Self { rpc, contract }
    }
}

#[async_trait]
impl ContractReader for RpcContractReader {
    async fn bounty_count(&self) -> Result<U256, BountyError> {
        let call = json!({
            "to": self.contract,
            "data": bounty_count_calldata(),
        });
        let result = self.rpc.call("eth_call", json!([call, "latest"])).await?;
        let data: Bytes = serde_json::from_value(result)
            .map_err(|e| BountyError::Decode(format!("eth_call result: {}", e)))?;

        let count = decode_bounty_count(&data)?;
        debug!("bountyCount() at {} = {}", self.contract, count);
        Ok(count)
    }
}
