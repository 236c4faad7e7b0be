//! Waiting for a submitted transaction to land before the next one is sent

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{B256, U64};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::{InclusionConfig, InclusionMode};
use crate::error::BountyError;
use crate::rpc::RpcClient;

/// What the watcher learned about a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inclusion {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    /// False when the watcher only waited and never saw a receipt
    pub verified: bool,
}

#[async_trait]
pub trait InclusionWatcher: Send + Sync {
    async fn await_inclusion(
        &self,
        tx_hash: B256,
        timeout: Duration,
    ) -> Result<Inclusion, BountyError>;
}

/// Subset of a transaction receipt the watcher cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptStatus {
    pub success: bool,
    pub block_number: Option<u64>,
}

#[async_trait]
pub trait ReceiptSource: Send + Sync {
    /// `Ok(None)` while the transaction is still pending
    async fn receipt(&self, tx_hash: B256) -> Result<Option<ReceiptStatus>, BountyError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    status: Option<U64>,
    block_number: Option<U64>,
}

/// Decode an `eth_getTransactionReceipt` result; null means still pending
fn parse_receipt(value: Value) -> Result<Option<ReceiptStatus>, BountyError> {
    if value.is_null() {
        return Ok(None);
    }

    let raw: RawReceipt = serde_json::from_value(value)?;
    // Pre-Byzantium receipts have no status field; treat them as successful
    let success = raw.status.map_or(true, |status| status == U64::from(1));
    Ok(Some(ReceiptStatus {
        success,
        block_number: raw.block_number.map(|n| n.to::<u64>()),
    }))
}

#[async_trait]
impl ReceiptSource for RpcClient {
    async fn receipt(&self, tx_hash: B256) -> Result<Option<ReceiptStatus>, BountyError> {
        let value = self
            .call("eth_getTransactionReceipt", json!([tx_hash]))
            .await?;
        parse_receipt(value)
    }
}

/// Polls for a receipt until it shows up or the timeout elapses
pub struct ReceiptPoller {
    source: Arc<dyn ReceiptSource>,
    interval: Duration,
}

impl ReceiptPoller {
    pub fn new(source: Arc<dyn ReceiptSource>, interval: Duration) -> Self {
        Self { source, interval }
    }
}

#[async_trait]
impl InclusionWatcher for ReceiptPoller {
    async fn await_inclusion(
        &self,
        tx_hash: B256,
        timeout: Duration,
    ) -> Result<Inclusion, BountyError> {
        let poll = async {
            loop {
                match self.source.receipt(tx_hash).await? {
                    Some(receipt) if receipt.success => {
                        return Ok(Inclusion {
                            tx_hash,
                            block_number: receipt.block_number,
                            verified: true,
                        });
                    }
                    Some(_) => return Err(BountyError::Reverted(tx_hash.to_string())),
                    None => {
                        debug!("{} still pending", tx_hash);
                        tokio::time::sleep(self.interval).await;
                    }
                }
            }
        };

        match tokio::time::timeout(timeout, poll).await {
            Ok(result) => {
                if let Ok(inclusion) = &result {
                    info!(
                        "Transaction {} included in block {:?}",
                        tx_hash, inclusion.block_number
                    );
                }
                result
            }
            Err(_) => Err(BountyError::Timeout {
                tx_hash: tx_hash.to_string(),
                secs: timeout.as_secs(),
            }),
        }
    }
}

/// Sleeps a fixed interval and assumes the transaction landed.
///
/// Nothing is verified; the timeout argument is ignored.
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl InclusionWatcher for FixedDelay {
    async fn await_inclusion(
        &self,
        tx_hash: B256,
        _timeout: Duration,
    ) -> Result<Inclusion, BountyError> {
        info!("Waiting {}s for {} (unverified)", self.delay.as_secs(), tx_hash);
        tokio::time::sleep(self.delay).await;
        Ok(Inclusion {
            tx_hash,
            block_number: None,
            verified: false,
        })
    }
}

/// Build the watcher selected by `[inclusion] mode`
pub fn watcher_from_config(
    config: &InclusionConfig,
    rpc: Arc<RpcClient>,
) -> Arc<dyn InclusionWatcher> {
    match config.mode {
        InclusionMode::Receipt => Arc::new(ReceiptPoller::new(rpc, config.poll_interval())),
        InclusionMode::FixedDelay => Arc::new(FixedDelay::new(config.fixed_delay())),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use tokio::time::Instant;

    struct ScriptedSource {
        replies: Mutex<VecDeque<Option<ReceiptStatus>>>,
        polls: Mutex<usize>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Option<ReceiptStatus>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                polls: Mutex::new(0),
            })
        }
    }

    #[async_trait]
    impl ReceiptSource for ScriptedSource {
        async fn receipt(&self, _tx_hash: B256) -> Result<Option<ReceiptStatus>, BountyError> {
            *self.polls.lock() += 1;
            Ok(self.replies.lock().pop_front().flatten())
        }
    }

    fn mined(success: bool) -> Option<ReceiptStatus> {
        Some(ReceiptStatus {
            success,
            block_number: Some(100),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_returns_after_receipt() {
        let source = ScriptedSource::new(vec![None, None, mined(true)]);
        let poller = ReceiptPoller::new(source.clone(), Duration::from_secs(2));

        let started = Instant::now();
        let inclusion = poller
            .await_inclusion(B256::ZERO, Duration::from_secs(60))
            .await
            .unwrap();

        assert!(inclusion.verified);
        assert_eq!(inclusion.block_number, Some(100));
        assert_eq!(*source.polls.lock(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_reports_revert() {
        let source = ScriptedSource::new(vec![mined(false)]);
        let poller = ReceiptPoller::new(source, Duration::from_secs(2));

        let result = poller
            .await_inclusion(B256::ZERO, Duration::from_secs(60))
            .await;
        assert!(matches!(result, Err(BountyError::Reverted(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_times_out() {
        let source = ScriptedSource::new(vec![]);
        let poller = ReceiptPoller::new(source, Duration::from_secs(2));

        let result = poller
            .await_inclusion(B256::ZERO, Duration::from_secs(10))
            .await;
        match result {
            Err(BountyError::Timeout { secs, .. }) => assert_eq!(secs, 10),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_waits_full_interval() {
        let watcher = FixedDelay::new(Duration::from_secs(15));
        let started = Instant::now();

        let inclusion = watcher
            .await_inclusion(B256::ZERO, Duration::from_secs(1))
            .await
            .unwrap();

        assert!(!inclusion.verified);
        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[test]
    fn test_parse_receipt() {
        assert_eq!(parse_receipt(Value::Null).unwrap(), None);

        let mined = parse_receipt(json!({"status": "0x1", "blockNumber": "0x1b4"})).unwrap();
        assert_eq!(
            mined,
            Some(ReceiptStatus {
                success: true,
                block_number: Some(436),
            })
        );

        let reverted = parse_receipt(json!({"status": "0x0", "blockNumber": "0x64"})).unwrap();
        assert!(!reverted.unwrap().success);

        let legacy = parse_receipt(json!({"blockNumber": "0x64", "root": "0xab"})).unwrap();
        assert!(legacy.unwrap().success);

        assert!(parse_receipt(json!({"status": "0xzz"})).is_err());
    }
}
