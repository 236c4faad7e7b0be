//! Wallet session management
//!
//! Owns the wallet SDK handle and the connection state (address or error).
//! Nothing here touches transactions.

use std::sync::Arc;

use alloy_primitives::{Address, U64};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::config::NetworkConfig;
use crate::error::BountyError;
use crate::provider::{HttpWalletProvider, WalletProvider};

/// A constructed wallet SDK able to hand out chain-scoped providers
#[async_trait]
pub trait WalletSdk: Send + Sync {
    async fn provider(
        &self,
        network: &NetworkConfig,
    ) -> Result<Arc<dyn WalletProvider>, BountyError>;
}

/// Constructs SDK handles; construction may fail
pub trait WalletSdkFactory: Send + Sync {
    fn create(&self, app_label: &str) -> Result<Arc<dyn WalletSdk>, BountyError>;
}

/// Connection state shown to the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub address: Option<Address>,
    pub error: Option<String>,
}

pub struct WalletSession {
    sdk: Option<Arc<dyn WalletSdk>>,
    network: NetworkConfig,
    state: Mutex<ConnectionState>,
    provider: Mutex<Option<Arc<dyn WalletProvider>>>,
}

impl WalletSession {
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            sdk: None,
            network,
            state: Mutex::new(ConnectionState::default()),
            provider: Mutex::new(None),
        }
    }

    /// Construct the SDK handle. Failure is recorded, not returned.
    pub fn initialize(&mut self, factory: &dyn WalletSdkFactory, app_label: &str) {
        debug!("Initializing wallet SDK for {}", app_label);
        match factory.create(app_label) {
            Ok(sdk) => {
                self.sdk = Some(sdk);
                self.state.lock().error = None;
                info!("Wallet SDK initialized");
            }
            Err(e) => {
                error!("SDK init failed: {:?}", e);
                self.sdk = None;
                self.state.lock().error = Some("Failed to initialize wallet SDK".to_string());
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.sdk.is_some()
    }

    /// Request account authorization and publish the first account
    pub async fn connect(&self) {
        let sdk = match &self.sdk {
            Some(sdk) => sdk.clone(),
            None => {
                self.state.lock().error = Some(BountyError::NotInitialized.to_string());
                return;
            }
        };

        self.state.lock().error = None;

        match self.try_connect(sdk.as_ref()).await {
            Ok((address, provider)) => {
                info!("Connected wallet {}", address);
                *self.provider.lock() = Some(provider);
                self.state.lock().address = Some(address);
            }
            Err(e) => {
                error!("Connection failed: {}", e);
                *self.provider.lock() = None;
                let message = e.to_string();
                let mut state = self.state.lock();
                state.address = None;
                state.error = Some(if message.is_empty() {
                    "Failed to connect wallet".to_string()
                } else {
                    message
                });
            }
        }
    }

    async fn try_connect(
        &self,
        sdk: &dyn WalletSdk,
    ) -> Result<(Address, Arc<dyn WalletProvider>), BountyError> {
        debug!("Getting provider for chain {}", self.network.chain_id);
        let provider = sdk.provider(&self.network).await?;

        let accounts = provider.request_accounts().await?;
        debug!("Accounts: {:?}", accounts);

        let address = accounts.first().copied().ok_or(BountyError::NoAccounts)?;
        Ok((address, provider))
    }

    /// Local reset only; the wallet keeps its authorization
    pub fn disconnect(&self) {
        *self.state.lock() = ConnectionState::default();
        *self.provider.lock() = None;
    }

    pub fn address(&self) -> Option<Address> {
        self.state.lock().address
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn state(&self) -> ConnectionState {
        self.state.lock().clone()
    }

    /// Provider from the last successful connect
    pub fn provider(&self) -> Option<Arc<dyn WalletProvider>> {
        self.provider.lock().clone()
    }
}

/// SDK backed by a wallet's local JSON-RPC endpoint
pub struct HttpWalletSdk {
    wallet_url: String,
    app_label: String,
}

#[async_trait]
impl WalletSdk for HttpWalletSdk {
    async fn provider(
        &self,
        network: &NetworkConfig,
    ) -> Result<Arc<dyn WalletProvider>, BountyError> {
        let provider = HttpWalletProvider::new(&self.wallet_url);
        ensure_chain(&provider, network.chain_id).await?;
        debug!("{} using wallet at {}", self.app_label, provider.url());
        Ok(Arc::new(provider))
    }
}

/// Make sure the wallet is on `chain_id`, asking it to switch when it is not
pub async fn ensure_chain(
    provider: &dyn WalletProvider,
    chain_id: u64,
) -> Result<(), BountyError> {
    let current = provider.request("eth_chainId", json!([])).await?;
    if chain_id_matches(&current, chain_id) {
        return Ok(());
    }

    warn!(
        "Wallet is on chain {}, requesting switch to {}",
        current, chain_id
    );
    provider
        .request(
            "wallet_switchEthereumChain",
            json!([{ "chainId": format!("0x{:x}", chain_id) }]),
        )
        .await
        .map_err(|e| {
            BountyError::Connection(format!("Wallet is not on chain {}: {}", chain_id, e))
        })?;
    Ok(())
}

fn chain_id_matches(value: &Value, chain_id: u64) -> bool {
    serde_json::from_value::<U64>(value.clone()).ok() == Some(U64::from(chain_id))
}

/// Factory for [`HttpWalletSdk`]
pub struct HttpWalletSdkFactory {
    wallet_url: String,
}

impl HttpWalletSdkFactory {
    pub fn new(wallet_url: impl Into<String>) -> Self {
        Self {
            wallet_url: wallet_url.into(),
        }
    }
}

impl WalletSdkFactory for HttpWalletSdkFactory {
    fn create(&self, app_label: &str) -> Result<Arc<dyn WalletSdk>, BountyError> {
        let url = self.wallet_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BountyError::SdkInit(format!(
                "wallet endpoint '{}' is not an http(s) URL",
                url
            )));
        }
        Ok(Arc::new(HttpWalletSdk {
            wallet_url: url.to_string(),
            app_label: app_label.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockProvider;
    use std::collections::VecDeque;

    fn base_sepolia() -> NetworkConfig {
        NetworkConfig {
            chain_id: 84532,
            rpc_url: "https://sepolia.base.org".to_string(),
            explorer_url: None,
        }
    }

    /// Hands out its providers in order, repeating the last one
    struct StaticSdk {
        providers: Mutex<VecDeque<Arc<MockProvider>>>,
        requested_chain: Mutex<Option<u64>>,
    }

    #[async_trait]
    impl WalletSdk for StaticSdk {
        async fn provider(
            &self,
            network: &NetworkConfig,
        ) -> Result<Arc<dyn WalletProvider>, BountyError> {
            *self.requested_chain.lock() = Some(network.chain_id);
            let mut providers = self.providers.lock();
            let provider = if providers.len() > 1 {
                providers.pop_front()
            } else {
                providers.front().cloned()
            };
            let provider = provider.ok_or(BountyError::NoProvider)?;
            Ok(provider)
        }
    }

    struct StaticFactory(Arc<StaticSdk>);

    impl WalletSdkFactory for StaticFactory {
        fn create(&self, _app_label: &str) -> Result<Arc<dyn WalletSdk>, BountyError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenFactory;

    impl WalletSdkFactory for BrokenFactory {
        fn create(&self, _app_label: &str) -> Result<Arc<dyn WalletSdk>, BountyError> {
            Err(BountyError::SdkInit("boom".to_string()))
        }
    }

    fn session_with(provider: MockProvider) -> (WalletSession, Arc<StaticSdk>) {
        session_with_sequence(vec![provider])
    }

    fn session_with_sequence(providers: Vec<MockProvider>) -> (WalletSession, Arc<StaticSdk>) {
        let sdk = Arc::new(StaticSdk {
            providers: Mutex::new(providers.into_iter().map(Arc::new).collect()),
            requested_chain: Mutex::new(None),
        });
        let mut session = WalletSession::new(base_sepolia());
        session.initialize(&StaticFactory(sdk.clone()), "Base Bounty Q&A");
        (session, sdk)
    }

    #[tokio::test]
    async fn test_connect_publishes_first_account() {
        let first = Address::with_last_byte(1);
        let (session, sdk) = session_with(MockProvider::new(vec![first, Address::with_last_byte(2)]));

        session.connect().await;

        assert_eq!(session.address(), Some(first));
        assert_eq!(session.error(), None);
        assert!(session.provider().is_some());
        assert_eq!(*sdk.requested_chain.lock(), Some(84532));
    }

    #[tokio::test]
    async fn test_connect_without_sdk() {
        let session = WalletSession::new(base_sepolia());
        session.connect().await;

        assert!(!session.is_initialized());
        assert_eq!(session.address(), None);
        assert_eq!(session.error().as_deref(), Some("SDK not ready yet"));
    }

    #[test]
    fn test_initialize_failure_is_recorded() {
        let mut session = WalletSession::new(base_sepolia());
        session.initialize(&BrokenFactory, "Base Bounty Q&A");

        assert!(!session.is_initialized());
        assert_eq!(
            session.error().as_deref(),
            Some("Failed to initialize wallet SDK")
        );
    }

    #[tokio::test]
    async fn test_connect_with_no_accounts() {
        let (session, _) = session_with(MockProvider::new(vec![]));
        session.connect().await;

        assert_eq!(session.address(), None);
        assert_eq!(session.error().as_deref(), Some("No accounts returned"));
        assert!(session.provider().is_none());
    }

    #[tokio::test]
    async fn test_connect_rejected_by_user() {
        let mut provider = MockProvider::new(vec![Address::with_last_byte(1)]);
        provider.accounts_error = Some("User rejected the request.".to_string());
        let (session, _) = session_with(provider);

        session.connect().await;

        assert_eq!(session.address(), None);
        assert_eq!(
            session.error().as_deref(),
            Some("RPC error 4001: User rejected the request.")
        );
    }

    #[tokio::test]
    async fn test_disconnect_clears_state() {
        let (session, _) = session_with(MockProvider::new(vec![Address::with_last_byte(1)]));
        session.connect().await;
        assert!(session.address().is_some());

        session.disconnect();

        assert_eq!(session.state(), ConnectionState::default());
        assert!(session.provider().is_none());
    }

    #[tokio::test]
    async fn test_failed_reconnect_drops_previous_account() {
        let (session, _) = session_with_sequence(vec![
            MockProvider::new(vec![Address::with_last_byte(1)]),
            MockProvider::new(vec![]),
        ]);
        session.connect().await;
        assert_eq!(session.address(), Some(Address::with_last_byte(1)));
        assert!(session.provider().is_some());

        session.connect().await;

        assert_eq!(session.address(), None);
        assert!(session.provider().is_none());
        assert_eq!(session.error().as_deref(), Some("No accounts returned"));
    }

    fn wallet_on_chain(chain_id: u64) -> MockProvider {
        let mut provider = MockProvider::new(vec![]);
        provider.chain_id = Some(chain_id);
        provider
    }

    #[tokio::test]
    async fn test_ensure_chain_accepts_matching_chain() {
        let provider = wallet_on_chain(84532);
        ensure_chain(&provider, 84532).await.unwrap();
        assert_eq!(provider.methods(), vec!["eth_chainId"]);
    }

    #[tokio::test]
    async fn test_ensure_chain_requests_switch() {
        let provider = wallet_on_chain(1);
        ensure_chain(&provider, 84532).await.unwrap();

        assert_eq!(
            provider.methods(),
            vec!["eth_chainId", "wallet_switchEthereumChain"]
        );
        let calls = provider.calls.lock();
        assert_eq!(calls[1].1, json!([{ "chainId": "0x14a34" }]));
    }

    #[tokio::test]
    async fn test_ensure_chain_switch_failure() {
        let mut provider = wallet_on_chain(1);
        provider.switch_error = Some("Unrecognized chain ID".to_string());

        match ensure_chain(&provider, 84532).await {
            Err(BountyError::Connection(message)) => {
                assert!(message.contains("84532"));
                assert!(message.contains("Unrecognized chain ID"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_http_factory_rejects_non_http_url() {
        assert!(HttpWalletSdkFactory::new("ws://127.0.0.1:1248")
            .create("Base Bounty Q&A")
            .is_err());
        assert!(HttpWalletSdkFactory::new("http://127.0.0.1:1248")
            .create("Base Bounty Q&A")
            .is_ok());
    }

    #[test]
    fn test_chain_id_matches() {
        assert!(chain_id_matches(&json!("0x14a34"), 84532));
        assert!(!chain_id_matches(&json!("0x1"), 84532));
        assert!(!chain_id_matches(&Value::Null, 84532));
        assert!(!chain_id_matches(&json!("0xzz"), 84532));
    }
}
