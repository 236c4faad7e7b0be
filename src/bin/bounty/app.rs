//! Wires configuration into the session manager and the transaction flow

use std::sync::Arc;

use alloy_primitives::Address;
use anyhow::{anyhow, Result};
use base_bounty::inclusion::watcher_from_config;
use base_bounty::{
    BountyFlow, Config, FlowSettings, HttpWalletProvider, HttpWalletSdkFactory, RpcClient,
    RpcContractReader, WalletSession,
};
use tracing::debug;

pub struct App {
    pub config: Config,
    pub session: WalletSession,
    pub flow: BountyFlow,
}

impl App {
    pub fn build(config: Config) -> Self {
        let rpc = Arc::new(RpcClient::new(&config.network.rpc_url));
        let reader = Arc::new(RpcContractReader::new(rpc.clone(), config.contracts.bounty));
        let watcher = watcher_from_config(&config.inclusion, rpc);

        // Submissions go through the wallet endpoint directly, connected or not
        let injected = Arc::new(HttpWalletProvider::new(&config.wallet.rpc_url));
        let flow = BountyFlow::new(reader, watcher, FlowSettings::from_config(&config))
            .with_provider(injected);

        let mut session = WalletSession::new(config.network.clone());
        session.initialize(
            &HttpWalletSdkFactory::new(config.wallet.rpc_url.clone()),
            &config.app.label,
        );
        debug!(
            "App ready: rpc={} wallet={} bounty={}",
            config.network.rpc_url, config.wallet.rpc_url, config.contracts.bounty
        );

        Self {
            config,
            session,
            flow,
        }
    }

    /// Connect the wallet session and return the published address
    pub async fn connect(&self) -> Result<Address> {
        self.session.connect().await;
        match self.session.address() {
            Some(address) => Ok(address),
            None => Err(anyhow!(self
                .session
                .error()
                .unwrap_or_else(|| "Failed to connect wallet".to_string()))),
        }
    }
}
