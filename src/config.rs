//! Configuration management
//!
//! Loads configuration from config.toml with support for:
//! - Target network (chain id, RPC endpoint, block explorer)
//! - Bounty and payment-token contract addresses
//! - Approval policy for the token allowance
//! - Inclusion strategy between the approval and the post
//! - Wallet endpoint

use std::path::Path;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::amount::parse_units;
use crate::error::BountyError;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub network: NetworkConfig,
    pub contracts: ContractsConfig,
    pub token: TokenConfig,
    pub approval: ApprovalConfig,
    #[serde(default)]
    pub inclusion: InclusionConfig,
    pub wallet: WalletConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Label presented to the wallet SDK
    pub label: String,
}

/// Chain the client talks to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub rpc_url: String,
    #[serde(default)]
    pub explorer_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractsConfig {
    pub bounty: Address,
    pub token: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    pub symbol: String,
    pub decimals: u8,
}

/// How much the bounty contract is allowed to pull from the token contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApprovalPolicy {
    /// Approve exactly the amount being posted
    Requested,
    /// Approve a fixed allowance regardless of the posted amount
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalConfig {
    pub policy: ApprovalPolicy,
    /// Decimal token units, only used by the fixed policy
    pub fixed_allowance: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InclusionMode {
    Receipt,
    FixedDelay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InclusionConfig {
    pub mode: InclusionMode,
    pub timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub fixed_delay_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    pub rpc_url: String,
}

impl Default for InclusionConfig {
    fn default() -> Self {
        Self {
            mode: InclusionMode::Receipt,
            timeout_secs: 120,
            poll_interval_secs: 2,
            fixed_delay_secs: 15,
        }
    }
}

impl InclusionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn fixed_delay(&self) -> Duration {
        Duration::from_secs(self.fixed_delay_secs)
    }
}

impl ApprovalConfig {
    /// Allowance to approve for a post of `requested` smallest units.
    pub fn allowance(&self, requested: U256, decimals: u8) -> Result<U256, BountyError> {
        match self.policy {
            ApprovalPolicy::Requested => Ok(requested),
            ApprovalPolicy::Fixed => parse_units(&self.fixed_allowance, decimals),
        }
    }
}

impl Config {
    /// Load from specific path, then apply environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config: Config = if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            // Use embedded default config
            toml::from_str(DEFAULT_CONFIG).context("Failed to parse default config")?
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Environment overrides; the lookup is injected so tests don't touch the process env.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("BASE_RPC_URL") {
            self.network.rpc_url = url;
        }
        if let Some(url) = non_empty("WALLET_RPC_URL") {
            self.wallet.rpc_url = url;
        }
        if let Some(addr) = non_empty("BOUNTY_CONTRACT") {
            self.contracts.bounty = addr
                .trim()
                .parse()
                .context("BOUNTY_CONTRACT is not a valid address")?;
        }
        if let Some(addr) = non_empty("TOKEN_CONTRACT") {
            self.contracts.token = addr
                .trim()
                .parse()
                .context("TOKEN_CONTRACT is not a valid address")?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.token.decimals > 36 {
            anyhow::bail!("token.decimals must be at most 36");
        }
        if self.approval.policy == ApprovalPolicy::Fixed {
            parse_units(&self.approval.fixed_allowance, self.token.decimals)
                .context("approval.fixed_allowance is not a valid amount")?;
        }
        Ok(())
    }

    /// Explorer link for a transaction hash, if an explorer is configured
    pub fn explorer_tx_url(&self, tx_hash: &str) -> Option<String> {
        self.network
            .explorer_url
            .as_ref()
            .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), tx_hash))
    }
}

impl Default for Config {
    fn default() -> Self {
        // The embedded default config ships with the crate and is covered by tests.
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|_| Self {
            app: AppConfig {
                label: "Base Bounty Q&A".to_string(),
            },
            network: NetworkConfig {
                chain_id: 84532,
                rpc_url: "https://sepolia.base.org".to_string(),
                explorer_url: Some("https://sepolia.basescan.org".to_string()),
            },
            contracts: ContractsConfig {
                bounty: Address::ZERO,
                token: Address::ZERO,
            },
            token: TokenConfig {
                symbol: "USDC".to_string(),
                decimals: 6,
            },
            approval: ApprovalConfig {
                policy: ApprovalPolicy::Fixed,
                fixed_allowance: "10".to_string(),
            },
            inclusion: InclusionConfig::default(),
            wallet: WalletConfig {
                rpc_url: "http://127.0.0.1:1248".to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.network.chain_id, 84532);
        assert_eq!(config.network.rpc_url, "https://sepolia.base.org");
        assert_eq!(
            config.contracts.bounty,
            address!("b4575AC1cCe8511feF15386BBD3012e35Ae573aa")
        );
        assert_eq!(config.token.decimals, 6);
        assert_eq!(config.approval.policy, ApprovalPolicy::Fixed);
        assert_eq!(config.inclusion.mode, InclusionMode::Receipt);
        assert_eq!(config.inclusion.fixed_delay(), Duration::from_secs(15));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load_from("/nonexistent/base-bounty.toml").unwrap();
        assert_eq!(config.app.label, "Base Bounty Q&A");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("BASE_RPC_URL", "http://localhost:8545"),
            ("WALLET_RPC_URL", ""),
            ("TOKEN_CONTRACT", "0x0000000000000000000000000000000000000001"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.network.rpc_url, "http://localhost:8545");
        // Empty values are ignored
        assert_eq!(config.wallet.rpc_url, "http://127.0.0.1:1248");
        assert_eq!(config.contracts.token, Address::with_last_byte(1));
    }

    #[test]
    fn test_env_override_rejects_bad_address() {
        let mut config = Config::default();
        let result = config.apply_env(|k| (k == "BOUNTY_CONTRACT").then(|| "0x1234".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_allowance_policy() {
        let mut approval = ApprovalConfig {
            policy: ApprovalPolicy::Requested,
            fixed_allowance: "10".to_string(),
        };
        let requested = U256::from(2_500_000u64);
        assert_eq!(approval.allowance(requested, 6).unwrap(), requested);

        approval.policy = ApprovalPolicy::Fixed;
        assert_eq!(
            approval.allowance(requested, 6).unwrap(),
            U256::from(10_000_000u64)
        );
    }

    #[test]
    fn test_explorer_tx_url() {
        let config = Config::default();
        assert_eq!(
            config.explorer_tx_url("0xabc").as_deref(),
            Some("https://sepolia.basescan.org/tx/0xabc")
        );
    }
}
